use chrono::Utc;
use rust_decimal_macros::dec;
use tempfile::TempDir;

use foliotrack_core::sankey::{SankeyCategory, SankeyConfig, SankeyRepositoryTrait};
use foliotrack_core::settings::SettingsRepositoryTrait;
use foliotrack_core::trades::{AssetKind, Trade, TradeRepositoryTrait};
use foliotrack_core::users::{User, UserRepositoryTrait};
use foliotrack_storage_sqlite::sankey::SankeyRepository;
use foliotrack_storage_sqlite::settings::SettingsRepository;
use foliotrack_storage_sqlite::trades::TradeRepository;
use foliotrack_storage_sqlite::users::UserRepository;
use foliotrack_storage_sqlite::{db, DatabaseError, Error};

struct Fixture {
    trades: TradeRepository,
    users: UserRepository,
    sankey: SankeyRepository,
    settings: SettingsRepository,
    _tmp: TempDir,
}

fn fixture() -> Fixture {
    let tmp = tempfile::tempdir().unwrap();
    let db_path = tmp.path().join("test.db");
    let pool = db::init(db_path.to_str().unwrap()).unwrap();
    let writer = db::spawn_writer(pool.clone());
    Fixture {
        trades: TradeRepository::new(pool.clone(), writer.clone()),
        users: UserRepository::new(pool.clone(), writer.clone()),
        sankey: SankeyRepository::new(pool.clone(), writer.clone()),
        settings: SettingsRepository::new(pool, writer),
        _tmp: tmp,
    }
}

fn user(id: &str) -> User {
    User {
        id: id.to_string(),
        subject: format!("test|{id}"),
        email: None,
        display_name: None,
        created_at: Utc::now(),
    }
}

fn trade(id: &str, user_id: &str) -> Trade {
    Trade {
        id: id.to_string(),
        user_id: user_id.to_string(),
        kind: AssetKind::Security,
        symbol: "SAP".to_string(),
        isin: Some("DE0007164600".to_string()),
        name: "SAP SE".to_string(),
        units: dec!(10),
        buy_price: dec!(100.50),
        currency: "EUR".to_string(),
        buy_date: Utc::now(),
        sold_units: dec!(0),
        realized_pl: dec!(0),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

#[tokio::test]
async fn trades_are_scoped_to_their_user() {
    let f = fixture();
    f.users.insert_user(user("u1")).await.unwrap();
    f.users.insert_user(user("u2")).await.unwrap();
    f.trades.insert_trade(trade("t1", "u1")).await.unwrap();

    assert_eq!(f.trades.get_trades("u1").unwrap().len(), 1);
    assert!(f.trades.get_trades("u2").unwrap().is_empty());
    assert!(f.trades.get_trade("u2", "t1").is_err());
}

#[tokio::test]
async fn trade_update_persists_decimal_fields() {
    let f = fixture();
    f.users.insert_user(user("u1")).await.unwrap();
    let mut stored = f.trades.insert_trade(trade("t1", "u1")).await.unwrap();

    stored.sold_units = dec!(2.5);
    stored.realized_pl = dec!(12.25);
    f.trades.update_trade(stored).await.unwrap();

    let reloaded = f.trades.get_trade("u1", "t1").unwrap();
    assert_eq!(reloaded.sold_units, dec!(2.5));
    assert_eq!(reloaded.realized_pl, dec!(12.25));
}

#[tokio::test]
async fn updating_another_users_trade_is_not_found() {
    let f = fixture();
    f.users.insert_user(user("u1")).await.unwrap();
    let mut stored = f.trades.insert_trade(trade("t1", "u1")).await.unwrap();

    stored.user_id = "u2".to_string();
    let err = stored.clone();
    assert!(matches!(
        f.trades.update_trade(err).await.unwrap_err(),
        Error::Database(DatabaseError::NotFound(_))
    ));
}

#[tokio::test]
async fn delete_returns_affected_row_count() {
    let f = fixture();
    f.users.insert_user(user("u1")).await.unwrap();
    f.trades.insert_trade(trade("t1", "u1")).await.unwrap();

    assert_eq!(f.trades.delete_trade("u1", "t1").await.unwrap(), 1);
    assert_eq!(f.trades.delete_trade("u1", "t1").await.unwrap(), 0);
}

#[tokio::test]
async fn duplicate_subject_violates_unique_constraint() {
    let f = fixture();
    f.users.insert_user(user("u1")).await.unwrap();
    let mut dup = user("u2");
    dup.subject = "test|u1".to_string();
    assert!(matches!(
        f.users.insert_user(dup).await.unwrap_err(),
        Error::Database(DatabaseError::UniqueViolation(_))
    ));
}

#[tokio::test]
async fn user_lookup_by_subject() {
    let f = fixture();
    f.users.insert_user(user("u1")).await.unwrap();
    let found = f.users.get_by_subject("test|u1").unwrap().unwrap();
    assert_eq!(found.id, "u1");
    assert!(f.users.get_by_subject("test|nobody").unwrap().is_none());
}

#[tokio::test]
async fn sankey_config_upserts_one_row_per_user() {
    let f = fixture();
    f.users.insert_user(user("u1")).await.unwrap();

    assert!(f.sankey.get_config("u1").unwrap().is_none());

    let config = SankeyConfig {
        monthly_income: dec!(3000),
        expenses: vec![SankeyCategory {
            name: "Rent".to_string(),
            amount: dec!(1200),
        }],
        savings: vec![],
    };
    f.sankey.upsert_config("u1", config.clone()).await.unwrap();

    let mut updated = config.clone();
    updated.monthly_income = dec!(3200);
    f.sankey.upsert_config("u1", updated.clone()).await.unwrap();

    assert_eq!(f.sankey.get_config("u1").unwrap(), Some(updated));
}

#[tokio::test]
async fn settings_replace_on_write() {
    let f = fixture();
    assert!(f.settings.get_setting("base_currency").unwrap().is_none());
    f.settings.set_setting("base_currency", "EUR").await.unwrap();
    f.settings.set_setting("base_currency", "USD").await.unwrap();
    assert_eq!(
        f.settings.get_setting("base_currency").unwrap().as_deref(),
        Some("USD")
    );
}
