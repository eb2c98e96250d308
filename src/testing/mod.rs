mod fake_validator;
mod memory_plist_store;

#[allow(unused_imports)]
pub use fake_validator::FakeValidator;
#[allow(unused_imports)]
pub use memory_plist_store::MemoryPlistStore;
