pub mod boost_repository;
pub mod comment_repository;
pub mod membership_repository;
pub mod profile_repository;
pub mod splik_repository;

pub use boost_repository::PgBoostRepository;
pub use comment_repository::PgCommentRepository;
pub use membership_repository::PgMembershipRepository;
pub use profile_repository::PgProfileRepository;
pub use splik_repository::PgSplikRepository;
