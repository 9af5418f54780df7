// End-to-end tests for the Splikz HTTP API
//
// Each test builds the full router with `build_router` and drives it
// in-process through `tower::ServiceExt::oneshot`. Postgres runs in a
// shared testcontainers instance and each test leases its own migrated
// database from `helpers::db_pool`. Payments, storage and email are
// replaced by the fakes in `helpers::fakes`.

mod test_boost;
mod test_feed;
mod test_profiles;
mod test_social;
