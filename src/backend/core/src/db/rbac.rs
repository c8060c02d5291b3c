//! `RbacStore` over Postgres.

use async_trait::async_trait;
use uuid::Uuid;

use super::Database;
use crate::rbac::{Permission, RbacStore, Role, StoreError, StoreResult};

const ROLE_COLUMNS: &str = "r.id, r.name, r.description, r.created_at, r.updated_at";
const PERMISSION_COLUMNS: &str = "p.id, p.name, p.description, p.created_at, p.updated_at";

impl Database {
    async fn ensure_exists(&self, table: &'static str, entity: &'static str, id: Uuid) -> StoreResult<()> {
        let exists: bool = sqlx::query_scalar(&format!(
            "SELECT EXISTS (SELECT 1 FROM {table} WHERE id = $1)"
        ))
        .bind(id)
        .fetch_one(self.pool())
        .await?;

        if !exists {
            return Err(StoreError::not_found(entity, id));
        }
        Ok(())
    }
}

#[async_trait]
impl RbacStore for Database {
    // ─────────────────────────────────────────────────────────────────────────
    // Roles
    // ─────────────────────────────────────────────────────────────────────────

    async fn create_role(&self, name: &str, description: &str) -> StoreResult<Role> {
        let role = Role::new(name, description);
        sqlx::query(
            r#"
            INSERT INTO roles (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(role.id)
        .bind(&role.name)
        .bind(&role.description)
        .bind(role.created_at)
        .bind(role.updated_at)
        .execute(self.pool())
        .await?;

        Ok(role)
    }

    async fn get_role(&self, id: Uuid) -> StoreResult<Role> {
        sqlx::query_as::<_, Role>(&format!("SELECT {ROLE_COLUMNS} FROM roles r WHERE r.id = $1"))
            .bind(id)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| StoreError::not_found("role", id))
    }

    async fn get_role_by_name(&self, name: &str) -> StoreResult<Role> {
        sqlx::query_as::<_, Role>(&format!("SELECT {ROLE_COLUMNS} FROM roles r WHERE r.name = $1"))
            .bind(name)
            .fetch_optional(self.pool())
            .await?
            .ok_or_else(|| StoreError::not_found("role", name))
    }

    async fn get_all_roles(&self) -> StoreResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(&format!(
            "SELECT {ROLE_COLUMNS} FROM roles r ORDER BY r.name"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(roles)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Permissions
    // ─────────────────────────────────────────────────────────────────────────

    async fn create_permission(&self, name: &str, description: &str) -> StoreResult<Permission> {
        let permission = Permission::new(name, description);
        sqlx::query(
            r#"
            INSERT INTO permissions (id, name, description, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(permission.id)
        .bind(&permission.name)
        .bind(&permission.description)
        .bind(permission.created_at)
        .bind(permission.updated_at)
        .execute(self.pool())
        .await?;

        Ok(permission)
    }

    async fn get_permission_by_name(&self, name: &str) -> StoreResult<Permission> {
        sqlx::query_as::<_, Permission>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions p WHERE p.name = $1"
        ))
        .bind(name)
        .fetch_optional(self.pool())
        .await?
        .ok_or_else(|| StoreError::not_found("permission", name))
    }

    async fn get_all_permissions(&self) -> StoreResult<Vec<Permission>> {
        let permissions = sqlx::query_as::<_, Permission>(&format!(
            "SELECT {PERMISSION_COLUMNS} FROM permissions p ORDER BY p.name"
        ))
        .fetch_all(self.pool())
        .await?;
        Ok(permissions)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edges
    // ─────────────────────────────────────────────────────────────────────────

    async fn assign_role_to_user(&self, user_id: Uuid, role_id: Uuid) -> StoreResult<()> {
        self.ensure_exists("users", "user", user_id).await?;
        self.ensure_exists("roles", "role", role_id).await?;

        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(user_id)
            .bind(role_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn remove_role_from_user(&self, user_id: Uuid, role_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query("DELETE FROM user_roles WHERE user_id = $1 AND role_id = $2")
            .bind(user_id)
            .bind(role_id)
            .execute(self.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found("user role", format!("{user_id}/{role_id}")));
        }
        Ok(())
    }

    async fn get_roles_for_user(&self, user_id: Uuid) -> StoreResult<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(&format!(
            r#"
            SELECT {ROLE_COLUMNS}
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            ORDER BY r.name
            "#
        ))
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(roles)
    }

    async fn assign_permission_to_role(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()> {
        self.ensure_exists("roles", "role", role_id).await?;
        self.ensure_exists("permissions", "permission", permission_id).await?;

        sqlx::query("INSERT INTO role_permissions (role_id, permission_id) VALUES ($1, $2)")
            .bind(role_id)
            .bind(permission_id)
            .execute(self.pool())
            .await?;
        Ok(())
    }

    async fn remove_permission_from_role(&self, role_id: Uuid, permission_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            "DELETE FROM role_permissions WHERE role_id = $1 AND permission_id = $2",
        )
        .bind(role_id)
        .bind(permission_id)
        .execute(self.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(
                "role permission",
                format!("{role_id}/{permission_id}"),
            ));
        }
        Ok(())
    }

    async fn get_permissions_for_role(&self, role_id: Uuid) -> StoreResult<Vec<Permission>> {
        let permissions = sqlx::query_as::<_, Permission>(&format!(
            r#"
            SELECT {PERMISSION_COLUMNS}
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            WHERE rp.role_id = $1
            ORDER BY p.name
            "#
        ))
        .bind(role_id)
        .fetch_all(self.pool())
        .await?;
        Ok(permissions)
    }

    /// Single round-trip join instead of the per-role walk.
    async fn get_permission_names_for_user(&self, user_id: Uuid) -> StoreResult<Vec<String>> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT p.name
            FROM permissions p
            JOIN role_permissions rp ON rp.permission_id = p.id
            JOIN user_roles ur ON ur.role_id = rp.role_id
            WHERE ur.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;
        Ok(names)
    }
}
