// src/services/catalog_service.rs

use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::SupplierRepository,
    models::catalog::{
        CategoryRecords, CategoryRecordsMut, CategorySummary, ServiceCategory, ServiceRecord,
        ServiceUpdate, ServicesCatalog,
    },
    services::lifecycle_service,
};

fn find_mut<'a, R: ServiceRecord>(records: &'a mut [R], service_id: &str) -> Option<&'a mut R> {
    records.iter_mut().find(|r| r.id() == service_id)
}

/// Liga/desliga um único serviço. Id desconhecido não altera nada.
pub fn toggle_service(
    catalog: &mut ServicesCatalog,
    category: ServiceCategory,
    service_id: &str,
    read_only: bool,
) -> Result<(), AppError> {
    if read_only {
        return Err(AppError::PermissionDenied);
    }

    fn flip<R: ServiceRecord>(records: &mut [R], service_id: &str) {
        if let Some(r) = find_mut(records, service_id) {
            r.set_enabled(!r.enabled());
        }
    }

    match catalog.records_mut(category) {
        CategoryRecordsMut::FlatRate(list) => flip(list, service_id),
        CategoryRecordsMut::RateCard(list) => flip(list, service_id),
        CategoryRecordsMut::Response(list) => flip(list, service_id),
    }
    Ok(())
}

/// Atualização tipada: o formato do pedido precisa bater com a categoria.
pub fn update_service(
    catalog: &mut ServicesCatalog,
    category: ServiceCategory,
    service_id: &str,
    update: ServiceUpdate,
    read_only: bool,
) -> Result<(), AppError> {
    if read_only {
        return Err(AppError::PermissionDenied);
    }

    let mismatch = || AppError::ServiceShapeMismatch {
        category: category.as_str().to_string(),
        update: format!("{:?}", update.shape()),
    };

    match (catalog.records_mut(category), &update) {
        (CategoryRecordsMut::FlatRate(list), ServiceUpdate::FlatRate { price, duration }) => {
            if let Some(r) = find_mut(list, service_id) {
                if let Some(p) = price {
                    r.price = Some(*p);
                }
                if let Some(d) = duration {
                    r.duration = Some(d.clone());
                }
            }
        }
        (
            CategoryRecordsMut::RateCard(list),
            ServiceUpdate::RateCard { hourly_rate, daily_rate, monthly_rate },
        ) => {
            if let Some(r) = find_mut(list, service_id) {
                r.hourly_rate = hourly_rate.or(r.hourly_rate);
                r.daily_rate = daily_rate.or(r.daily_rate);
                r.monthly_rate = monthly_rate.or(r.monthly_rate);
            }
        }
        (CategoryRecordsMut::Response(list), ServiceUpdate::Response { price, response_time }) => {
            if let Some(r) = find_mut(list, service_id) {
                if let Some(p) = price {
                    r.price = Some(*p);
                }
                if let Some(t) = response_time {
                    r.response_time = Some(t.clone());
                }
            }
        }
        _ => return Err(mismatch()),
    }
    Ok(())
}

pub fn enabled_count(catalog: &ServicesCatalog, category: ServiceCategory) -> usize {
    fn count<R: ServiceRecord>(records: &[R]) -> usize {
        records.iter().filter(|r| r.enabled()).count()
    }

    match catalog.records(category) {
        CategoryRecords::FlatRate(list) => count(list),
        CategoryRecords::RateCard(list) => count(list),
        CategoryRecords::Response(list) => count(list),
    }
}

fn total(catalog: &ServicesCatalog, category: ServiceCategory) -> usize {
    match catalog.records(category) {
        CategoryRecords::FlatRate(list) => list.len(),
        CategoryRecords::RateCard(list) => list.len(),
        CategoryRecords::Response(list) => list.len(),
    }
}

pub fn summaries(catalog: &ServicesCatalog) -> Vec<CategorySummary> {
    ServiceCategory::ALL
        .iter()
        .map(|c| CategorySummary {
            category: *c,
            shape: c.shape(),
            enabled_count: enabled_count(catalog, *c),
            total: total(catalog, *c),
        })
        .collect()
}

// Total de serviços ligados (usado no diretório)
pub fn services_offered(catalog: &ServicesCatalog) -> usize {
    ServiceCategory::ALL.iter().map(|c| enabled_count(catalog, *c)).sum()
}

#[derive(Clone)]
pub struct CatalogService {
    repo: SupplierRepository,
}

impl CatalogService {
    pub fn new(repo: SupplierRepository) -> Self {
        Self { repo }
    }

    pub async fn get_catalog(&self, supplier_id: Uuid) -> Result<ServicesCatalog, AppError> {
        self.repo
            .find_by_id(supplier_id)
            .await
            .map(|p| p.services)
            .ok_or(AppError::SupplierNotFound)
    }

    pub async fn toggle_service(
        &self,
        supplier_id: Uuid,
        category: ServiceCategory,
        service_id: &str,
        read_only: bool,
    ) -> Result<ServicesCatalog, AppError> {
        self.repo
            .update(supplier_id, |profile| {
                lifecycle_service::ensure_mutable(profile)?;
                toggle_service(&mut profile.services, category, service_id, read_only)?;
                Ok(profile.services.clone())
            })
            .await
    }

    pub async fn update_service(
        &self,
        supplier_id: Uuid,
        category: ServiceCategory,
        service_id: &str,
        update: ServiceUpdate,
        read_only: bool,
    ) -> Result<ServicesCatalog, AppError> {
        self.repo
            .update(supplier_id, |profile| {
                lifecycle_service::ensure_mutable(profile)?;
                update_service(&mut profile.services, category, service_id, update, read_only)?;
                Ok(profile.services.clone())
            })
            .await
    }
}
