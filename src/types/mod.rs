mod models;

pub use models::{BROWSERID_ROLE, NameList, SecurityPolicy, UserRecord};
