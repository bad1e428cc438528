use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Navigation to {path} was aborted by a guard")]
    Aborted { path: String },

    #[error("Navigation to {path} exceeded {max_redirects} redirects")]
    RedirectLoop { path: String, max_redirects: usize },
}
