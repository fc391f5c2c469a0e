//! Core TypeCodes functionality
//!
//! [`TypeCodes`] owns the shared registry and, when a database is configured,
//! a PostgreSQL pool. It runs caller-written SQL with parameters bound and
//! columns read through the registry.

use column_mapping::{Entity, EntityBinding, PgBindings, PgResultRow};
use config::{AppConfig, DatabaseConfig, MarshallingConfig};
use sqlx::PgPool;
use sqlx::postgres::{PgArguments, PgRow};
use std::sync::Arc;
use std::time::Duration;
use type_mapping::{NativeValue, ParseOptions, Registry, TypeTag};

use crate::errors::TypeCodesError;

/// Registry options taken from configuration
pub fn parse_options(config: &MarshallingConfig) -> ParseOptions {
    ParseOptions {
        grouping_separator: config.grouping_separator,
        trim: config.trim_parameters,
    }
}

/// Main TypeCodes coordinator: the registry plus an optional connection pool
#[derive(Clone)]
pub struct TypeCodes {
    registry: Arc<Registry>,
    pool: Option<PgPool>,
}

impl TypeCodes {
    /// Marshalling only, no database
    pub fn new(config: &MarshallingConfig) -> Result<Self, TypeCodesError> {
        config.validate()?;
        Ok(Self::with_registry(Arc::new(Registry::with_options(
            parse_options(config),
        ))))
    }

    /// Use an already built registry, e.g. a partial one
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self {
            registry,
            pool: None,
        }
    }

    /// Build the registry and connect when the configuration names a database
    pub async fn connect(config: &AppConfig) -> Result<Self, TypeCodesError> {
        config.validate()?;
        let mut typecodes = Self::new(&config.marshalling)?;
        if let Some(database) = &config.database {
            typecodes.pool = Some(Self::create_pool(database).await?);
        }
        Ok(typecodes)
    }

    /// Load configuration from the environment and connect
    pub async fn from_env() -> Result<Self, TypeCodesError> {
        let config = AppConfig::load()?;
        Self::connect(&config).await
    }

    async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, TypeCodesError> {
        let connection_string = config.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout_seconds))
            .idle_timeout(Duration::from_secs(config.idle_timeout_seconds));

        // Set max lifetime if specified
        if config.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(config.max_lifetime_seconds));
        }

        debug_log!("Connecting to {}:{}/{}", config.host, config.port, config.database);
        Ok(pool_options.connect(&connection_string).await?)
    }

    /// Attach an existing pool
    pub fn with_pool(mut self, pool: PgPool) -> Self {
        self.pool = Some(pool);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn shared_registry(&self) -> Arc<Registry> {
        Arc::clone(&self.registry)
    }

    /// Get database pool reference
    pub fn pool(&self) -> Result<&PgPool, TypeCodesError> {
        self.pool.as_ref().ok_or(TypeCodesError::NoDatabase)
    }

    // ========================================
    // Statements
    // ========================================

    /// Bind tagged values as `$1..$n`
    pub fn bind_params(
        &self,
        params: &[(TypeTag, NativeValue)],
    ) -> Result<PgArguments, TypeCodesError> {
        let mut bindings = PgBindings::new();
        for (index, (tag, value)) in params.iter().enumerate() {
            self.registry.bind(*tag, &mut bindings, index, value)?;
        }
        Ok(bindings.into_arguments())
    }

    /// Run a statement and return the number of affected rows
    pub async fn execute(
        &self,
        sql: &str,
        params: &[(TypeTag, NativeValue)],
    ) -> Result<u64, TypeCodesError> {
        let arguments = self.bind_params(params)?;
        debug_log!("Executing: {} ({} parameters)", sql, params.len());
        let result = sqlx::query_with(sql, arguments)
            .execute(self.pool()?)
            .await?;
        Ok(result.rows_affected())
    }

    /// Run a query and read each row's columns as `tags`, in order
    pub async fn fetch_values(
        &self,
        sql: &str,
        params: &[(TypeTag, NativeValue)],
        tags: &[TypeTag],
    ) -> Result<Vec<Vec<NativeValue>>, TypeCodesError> {
        let rows = self.fetch_rows(sql, params).await?;
        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            let row = PgResultRow(row);
            let mut columns = Vec::with_capacity(tags.len());
            for (index, tag) in tags.iter().enumerate() {
                columns.push(self.registry.read(*tag, &row, index)?);
            }
            values.push(columns);
        }
        Ok(values)
    }

    /// Run a query and read the first row into `entity`, all mapped columns in table order.
    ///
    /// Returns `false` when the query produced no row.
    pub async fn fetch_into<E: Entity>(
        &self,
        sql: &str,
        params: &[(TypeTag, NativeValue)],
        entity: &mut E,
    ) -> Result<bool, TypeCodesError> {
        let arguments = self.bind_params(params)?;
        debug_log!("Fetching one: {}", sql);
        let row = sqlx::query_with(sql, arguments)
            .fetch_optional(self.pool()?)
            .await?;

        match row {
            Some(row) => {
                entity.read_all(&self.registry, &PgResultRow(&row), 0)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Run a query and build one entity per row
    pub async fn fetch_entities<E: Entity + Default>(
        &self,
        sql: &str,
        params: &[(TypeTag, NativeValue)],
    ) -> Result<Vec<E>, TypeCodesError> {
        let rows = self.fetch_rows(sql, params).await?;
        let mut entities = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut entity = E::default();
            entity.read_all(&self.registry, &PgResultRow(row), 0)?;
            entities.push(entity);
        }
        Ok(entities)
    }

    async fn fetch_rows(
        &self,
        sql: &str,
        params: &[(TypeTag, NativeValue)],
    ) -> Result<Vec<PgRow>, TypeCodesError> {
        let arguments = self.bind_params(params)?;
        debug_log!("Fetching: {} ({} parameters)", sql, params.len());
        Ok(sqlx::query_with(sql, arguments)
            .fetch_all(self.pool()?)
            .await?)
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), TypeCodesError> {
        sqlx::query("SELECT 1").fetch_one(self.pool()?).await?;
        Ok(())
    }
}
