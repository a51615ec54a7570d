use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};

/// Rows mirror the public Bangladesh geocode dataset; ids stay textual
/// because that is how the dataset ships them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct District {
    pub id: String,
    pub division_id: Option<String>,
    pub name: String,
    pub bn_name: Option<String>,
    pub lat: Option<String>,
    #[serde(rename = "long")]
    pub lon: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Upazila {
    pub id: String,
    pub district_id: Option<String>,
    pub name: String,
    pub bn_name: Option<String>,
}

pub async fn insert_districts(db: &PgPool, rows: &[District]) -> sqlx::Result<u64> {
    let mut tx = db.begin().await?;
    for d in rows {
        sqlx::query(
            r#"
            INSERT INTO districts (id, division_id, name, bn_name, lat, lon)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(&d.id)
        .bind(&d.division_id)
        .bind(&d.name)
        .bind(&d.bn_name)
        .bind(&d.lat)
        .bind(&d.lon)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(rows.len() as u64)
}

pub async fn insert_upazilas(db: &PgPool, rows: &[Upazila]) -> sqlx::Result<u64> {
    let mut tx = db.begin().await?;
    for u in rows {
        sqlx::query(
            r#"
            INSERT INTO upazilas (id, district_id, name, bn_name)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&u.id)
        .bind(&u.district_id)
        .bind(&u.name)
        .bind(&u.bn_name)
        .execute(&mut *tx)
        .await?;
    }
    tx.commit().await?;
    Ok(rows.len() as u64)
}

pub async fn list_districts(db: &PgPool) -> sqlx::Result<Vec<District>> {
    let rows = sqlx::query_as::<_, District>(
        "SELECT id, division_id, name, bn_name, lat, lon FROM districts ORDER BY name",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}

pub async fn list_upazilas(db: &PgPool) -> sqlx::Result<Vec<Upazila>> {
    let rows = sqlx::query_as::<_, Upazila>(
        "SELECT id, district_id, name, bn_name FROM upazilas ORDER BY name",
    )
    .fetch_all(db)
    .await?;
    Ok(rows)
}
