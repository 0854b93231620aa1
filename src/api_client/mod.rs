mod sdk_client;

pub use sdk_client::SdkClient;
