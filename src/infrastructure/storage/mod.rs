mod local_fallback;

pub use local_fallback::LocalFallbackStore;
