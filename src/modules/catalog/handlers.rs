use axum::{
    Json,
    extract::{Path, Query, State},
};
use sea_orm::sea_query::Expr;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select,
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::modules::catalog::entities::{category, product};
use crate::shared::{
    error::{AppError, AppResult},
    state::AppState,
};

const DEFAULT_PAGE_SIZE: u64 = 20;
const MAX_PAGE_SIZE: u64 = 100;

#[derive(Deserialize, Default)]
pub struct ProductListParams {
    pub category: Option<String>,
    pub search: Option<String>,
    pub popular: Option<bool>,
    pub new: Option<bool>,
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

/// Composes the optional predicates into one select. Ordering is fixed:
/// newest first.
fn product_filter(params: &ProductListParams) -> Select<product::Entity> {
    let mut query = product::Entity::find();

    if let Some(category_name) = &params.category {
        query = query
            .join(JoinType::InnerJoin, product::Relation::Category.def())
            .filter(category::Column::Name.eq(category_name.clone()));
    }

    if let Some(search) = &params.search {
        if !search.is_empty() {
            let pattern = format!("%{}%", search);
            query = query.filter(
                Condition::any()
                    .add(
                        Expr::col((product::Entity, product::Column::Name))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((product::Entity, product::Column::Description))
                            .ilike(pattern.clone()),
                    )
                    .add(
                        Expr::col((product::Entity, product::Column::Manufacturer)).ilike(pattern),
                    ),
            );
        }
    }

    if params.popular.unwrap_or(false) {
        query = query.filter(product::Column::IsPopular.eq(true));
    }
    if params.new.unwrap_or(false) {
        query = query.filter(product::Column::IsNew.eq(true));
    }

    query.order_by_desc(product::Column::CreatedAt)
}

pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Value>> {
    let categories = category::Entity::find()
        .order_by_asc(category::Column::Id)
        .all(&state.db)
        .await?;

    Ok(Json(json!({ "success": true, "categories": categories })))
}

pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> AppResult<Json<Value>> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);

    let paginator = product_filter(&params).paginate(&state.db, limit);
    let pages = paginator.num_items_and_pages().await?;
    let products = paginator.fetch_page(page - 1).await?;

    Ok(Json(json!({
        "success": true,
        "products": products,
        "total": pages.number_of_items,
        "page": page,
        "totalPages": pages.number_of_pages,
    })))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Value>> {
    let product = product::Entity::find_by_id(id)
        .one(&state.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product not found".to_string()))?;

    Ok(Json(json!({ "success": true, "product": product })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    #[test]
    fn search_filter_matches_name_description_and_manufacturer() {
        let params = ProductListParams {
            search: Some("vitamin".to_string()),
            ..Default::default()
        };
        let sql = product_filter(&params).build(DbBackend::Postgres).to_string();

        assert_eq!(sql.matches("ILIKE").count(), 3);
        assert!(sql.contains("%vitamin%"));
        assert!(sql.contains("ORDER BY \"products\".\"created_at\" DESC"));
    }

    #[test]
    fn flag_filters_compose_with_search() {
        let params = ProductListParams {
            search: Some("vitamin".to_string()),
            popular: Some(true),
            new: Some(true),
            ..Default::default()
        };
        let sql = product_filter(&params).build(DbBackend::Postgres).to_string();

        assert!(sql.contains("\"is_popular\" = TRUE"));
        assert!(sql.contains("\"is_new\" = TRUE"));
        assert!(sql.contains("ILIKE"));
    }

    #[test]
    fn category_filter_joins_on_category_name() {
        let params = ProductListParams {
            category: Some("Vitamins".to_string()),
            ..Default::default()
        };
        let sql = product_filter(&params).build(DbBackend::Postgres).to_string();

        assert!(sql.contains("INNER JOIN \"categories\""));
        assert!(sql.contains("\"categories\".\"name\" = 'Vitamins'"));
    }

    #[test]
    fn no_params_means_no_predicates() {
        let sql = product_filter(&ProductListParams::default())
            .build(DbBackend::Postgres)
            .to_string();

        assert!(!sql.contains("WHERE"));
        assert!(!sql.contains("JOIN"));
    }
}
