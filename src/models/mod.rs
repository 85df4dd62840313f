mod article;
mod category;
mod engagement;
mod perspective;
mod user;

pub use article::{Article, ArticleFilter, BiasLabel, NewArticle};
pub use category::{Category, NewCategory};
pub use engagement::{Feedback, NewFeedback, NewSavedCategory, SavedCategory, MAX_COMMENT_LEN};
pub use perspective::{NewPerspective, Perspective, PerspectiveType};
pub use user::{AuthType, GoogleProfile, NewUser, Role, User};
