use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlescopeError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Bluetooth error: {0}")]
    Bluetooth(String),

    #[error("No Bluetooth adapter available: {0}")]
    NoAdapter(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Characteristic not found: {0}")]
    CharacteristicNotFound(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<btleplug::Error> for BlescopeError {
    fn from(e: btleplug::Error) -> Self {
        match e {
            btleplug::Error::DeviceNotFound => {
                BlescopeError::DeviceNotFound("peripheral disappeared".into())
            }
            btleplug::Error::NotConnected => {
                BlescopeError::Connection("peripheral not connected".into())
            }
            btleplug::Error::TimedOut(d) => {
                BlescopeError::Timeout(format!("BLE operation timed out after {:?}", d))
            }
            other => BlescopeError::Bluetooth(other.to_string()),
        }
    }
}
