//! Redis implementation of the mapping store.

use async_trait::async_trait;
use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use tracing::info;

use crate::domain::entities::NewMapping;
use crate::domain::repositories::{InsertOutcome, MappingRepository, StoreError};

/// Writes the hash only when the key is absent. Returns 1 if written, 0 if taken.
const INSERT_IF_ABSENT_LUA: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 1 then
    return 0
end
redis.call('HSET', KEYS[1], 'short_code', ARGV[1], 'original_url', ARGV[2], 'created_at', ARGV[3], 'visit_count', 0)
return 1
"#;

/// Adds one to `visit_count` of an existing hash. Returns -1 if the key is absent.
const INCREMENT_IF_PRESENT_LUA: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return -1
end
return redis.call('HINCRBY', KEYS[1], 'visit_count', 1)
"#;

/// Mapping store keeping one Redis hash per short code.
///
/// Keys are `{namespace}:{code}`. Both operations run as Lua scripts, which
/// Redis executes atomically, so the existence check and the write can't be
/// interleaved with another client.
pub struct RedisMappingRepository {
    client: ConnectionManager,
    namespace: String,
    insert_script: Script,
    increment_script: Script,
}

impl RedisMappingRepository {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Redis`] if the URL is invalid, the connection
    /// cannot be established, or the PING fails.
    pub async fn connect(redis_url: &str, namespace: impl Into<String>) -> Result<Self, StoreError> {
        let namespace = namespace.into();
        info!(%namespace, "Connecting to Redis mapping store");

        let client = Client::open(redis_url)?;
        let manager = ConnectionManager::new(client).await?;

        let mut test_conn = manager.clone();
        test_conn.ping::<()>().await?;

        info!("Connected to Redis");

        Ok(Self {
            client: manager,
            namespace,
            insert_script: Script::new(INSERT_IF_ABSENT_LUA),
            increment_script: Script::new(INCREMENT_IF_PRESENT_LUA),
        })
    }

    fn build_key(&self, code: &str) -> String {
        format!("{}:{}", self.namespace, code)
    }
}

#[async_trait]
impl MappingRepository for RedisMappingRepository {
    async fn insert_if_absent(&self, new_mapping: NewMapping) -> Result<InsertOutcome, StoreError> {
        let key = self.build_key(&new_mapping.code);
        let mut conn = self.client.clone();

        let written: i64 = self
            .insert_script
            .key(&key)
            .arg(&new_mapping.code)
            .arg(&new_mapping.original_url)
            .arg(new_mapping.created_at)
            .invoke_async(&mut conn)
            .await?;

        if written == 1 {
            Ok(InsertOutcome::Inserted)
        } else {
            Ok(InsertOutcome::AlreadyExists)
        }
    }

    async fn increment_visit_count(&self, code: &str) -> Result<i64, StoreError> {
        let key = self.build_key(code);
        let mut conn = self.client.clone();

        let visit_count: i64 = self
            .increment_script
            .key(&key)
            .invoke_async(&mut conn)
            .await?;

        if visit_count < 0 {
            return Err(StoreError::not_found(code));
        }

        Ok(visit_count)
    }

    async fn health_check(&self) -> bool {
        let mut conn = self.client.clone();
        conn.ping::<()>().await.is_ok()
    }
}
