pub use super::records::Entity as Records;
