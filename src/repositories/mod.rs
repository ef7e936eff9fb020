//! Article persistence
//!
//! [`ArticleStore`] is the seam the job runner and the CLI program against;
//! [`JsonArticleStore`] is the file-backed implementation.
//!
//! # Usage
//!
//! ```rust,no_run
//! use autoblog::models::NewArticle;
//! use autoblog::repositories::{ArticleStore, JsonArticleStore};
//!
//! # async fn example() -> Result<(), autoblog::errors::StoreError> {
//! let store = JsonArticleStore::open("./data/articles.json").await?;
//! let article = store
//!     .create(NewArticle::new("Cloud Computing 101", "Para one.\n\nPara two."))
//!     .await?;
//! assert_eq!(article.slug, "cloud-computing-101");
//! # Ok(())
//! # }
//! ```

pub mod article;
pub mod traits;

pub use article::{sort_newest_first, JsonArticleStore};
pub use traits::ArticleStore;
