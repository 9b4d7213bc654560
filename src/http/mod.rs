pub mod gateway;
pub mod request;
pub mod session;
pub mod transport;

pub use gateway::{RequestGateway, SESSION_HEADER};
pub use request::{dispatch, parse_json};
pub use session::{SessionManager, SESSION_SET_HEADER};
pub use transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};
