pub(crate) mod classes;
pub(crate) mod errors;
pub(crate) mod handlers;
pub(crate) mod lessons;
pub(crate) mod pagination;
pub(crate) mod quizzes;
pub(crate) mod router;
