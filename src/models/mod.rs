pub mod helper;
pub mod request;
pub mod user;

pub use helper::{HelperLocation, LocationPing, LocationReport, RequestRef};
pub use request::{AcceptedRequest, Coordinate, NewRequest, Request, RequestDraft, RequestStatus};
pub use user::{NewUser, Role, User, UserRecord};
