pub mod attendance;
pub mod checklist;
pub mod device;
pub mod people;
pub mod session;
pub mod venue;
