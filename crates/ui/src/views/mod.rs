mod login;
mod state;
mod subject;
mod year_prompt;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use login::LoginView;
pub use state::{ViewError, ViewState, view_state_from_resource};
pub use subject::SubjectView;
pub use year_prompt::YearPrompt;
