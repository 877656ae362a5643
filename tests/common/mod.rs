#![allow(dead_code)]

use std::env;

use actix_web::test::TestRequest;
use chrono::{FixedOffset, NaiveDate, TimeZone};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;

use squad_manager::config::{Config, MEMORY_DATABASE_URL};
use squad_manager::database::SquadRepositoryFactory;
use squad_manager::database::models::{
    Range, Squad, SquadId, SquadMember, Timestamp, format_date,
};

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn test_config() -> Config {
    Config {
        database_url: MEMORY_DATABASE_URL.to_string(),
        database_name: "SquadManagerTestDB".to_string(),
        database_timeout_ms: 1000,
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
    }
}

/// Nothing listens on port 1, so dialing fails quickly.
pub fn unreachable_config() -> Config {
    Config {
        database_url: "mongodb://127.0.0.1:1".to_string(),
        database_timeout_ms: 50,
        ..test_config()
    }
}

pub const MONGODB_URL_VAR: &str = "TEST_MONGODB_URL";

/// Config for a throwaway database on the server named by `TEST_MONGODB_URL`,
/// or `None` when the variable is unset.
pub fn mongo_config() -> Option<Config> {
    let database_url = env::var(MONGODB_URL_VAR).ok().filter(|url| !url.is_empty())?;
    Some(Config {
        database_url,
        database_name: format!("SquadManagerTest_{}", SquadId::generate()),
        database_timeout_ms: 5000,
        ..test_config()
    })
}

/// Drops the database a `mongo_config()` run wrote to.
pub async fn drop_mongo_database(config: &Config) {
    let client = mongodb::Client::with_uri_str(&config.database_url)
        .await
        .expect("mongodb client");
    client
        .database(&config.database_name)
        .drop()
        .await
        .expect("drop test database");
}

pub fn memory_factory() -> SquadRepositoryFactory {
    setup_test_env();
    SquadRepositoryFactory::new(test_config())
}

/// Midnight UTC on the given day.
pub fn date(year: i32, month: u32, day: u32) -> Timestamp {
    let naive = NaiveDate::from_ymd_opt(year, month, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid calendar date");
    FixedOffset::east_opt(0)
        .and_then(|utc| utc.from_local_datetime(&naive).single())
        .expect("unambiguous UTC datetime")
}

pub fn member(begin: Timestamp, end: Timestamp) -> SquadMember {
    let email: String = SafeEmail().fake();
    SquadMember::new(email, Range::new(begin, end))
}

/// Three members: before, inside and after the Aug 11 - Sep 15 2017 window.
pub fn staggered_members() -> Vec<SquadMember> {
    vec![
        member(date(2017, 7, 30), date(2017, 8, 10)),
        member(date(2017, 8, 11), date(2017, 9, 15)),
        member(date(2017, 9, 20), date(2018, 2, 7)),
    ]
}

// Request builders

fn with_window(path: &str, begin: Option<Timestamp>, end: Option<Timestamp>) -> String {
    let mut params = Vec::new();
    if let Some(begin) = begin {
        params.push(format!("begin={}", format_date(&begin)));
    }
    if let Some(end) = end {
        params.push(format!("end={}", format_date(&end)));
    }

    if params.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, params.join("&"))
    }
}

pub fn get_squad_list(begin: Option<Timestamp>, end: Option<Timestamp>) -> TestRequest {
    TestRequest::get().uri(&with_window("/squad", begin, end))
}

pub fn post_squad() -> TestRequest {
    TestRequest::post().uri("/squad")
}

pub fn put_squad_list(squads: &[Squad]) -> TestRequest {
    TestRequest::put().uri("/squad").set_json(squads)
}

pub fn get_squad(squad_id: &str, begin: Option<Timestamp>, end: Option<Timestamp>) -> TestRequest {
    TestRequest::get().uri(&with_window(&format!("/squad/{}", squad_id), begin, end))
}

pub fn post_squad_member(squad_id: &str, member: &SquadMember) -> TestRequest {
    TestRequest::post()
        .uri(&format!("/squad/{}", squad_id))
        .set_json(member)
}
