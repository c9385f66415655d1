use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeviceId {
    id: String,
}

impl DeviceId {
    pub fn new_from(id: String) -> DeviceId {
        DeviceId { id }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}
