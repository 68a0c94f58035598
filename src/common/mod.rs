mod request_url;
mod state;

pub use request_url::RequestUrl;
pub use state::AppState;
