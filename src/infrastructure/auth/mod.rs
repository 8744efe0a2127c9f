mod device_broker;
mod token_cache;

pub use device_broker::DeviceCodeBroker;
pub use token_cache::{CachedAccount, FileTokenCache};
