pub mod devpost;
pub mod grants_gov;
