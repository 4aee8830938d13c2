use serde::Serialize;

/// Body of the `/health` response.
#[derive(Serialize, Debug)]
pub struct Health {
    pub status: &'static str,
}
