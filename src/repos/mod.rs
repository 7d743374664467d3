pub mod post_repo;
