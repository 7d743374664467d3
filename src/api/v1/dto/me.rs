use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PrivilegesResponse {
    // None: anonymous (grant されていない)
    pub granted: Option<Vec<String>>,
}
