//! Category service
//!
//! CRUD for budget categories. Transactions refer to categories by name and
//! are never touched here: deleting or renaming a category leaves existing
//! transactions pointing at the old name.

use tracing::warn;

use crate::audit::EntityType;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{Amount, Category, CategoryId, TransactionType};
use crate::storage::Storage;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

/// Changes to apply to an existing category
#[derive(Debug, Clone, Default)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    pub category_type: Option<TransactionType>,
    pub budget: Option<Amount>,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(
        &self,
        name: &str,
        category_type: TransactionType,
        budget: Amount,
    ) -> BudgetResult<Category> {
        let name = name.trim();

        if self.storage.categories.get_by_name(name)?.is_some() {
            warn!("A category named '{}' already exists", name);
        }

        let category = Category::new(name, category_type, budget);
        category
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        self.storage
            .commit(|| self.storage.categories.insert(category.clone()))?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }

    pub fn get(&self, id: CategoryId) -> BudgetResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name or ID string
    pub fn find(&self, identifier: &str) -> BudgetResult<Option<Category>> {
        self.storage.categories.find(identifier)
    }

    /// List all categories in definition order
    pub fn list(&self) -> BudgetResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    /// List categories of one type
    pub fn list_by_type(&self, category_type: TransactionType) -> BudgetResult<Vec<Category>> {
        let mut categories = self.list()?;
        categories.retain(|c| c.category_type == category_type);
        Ok(categories)
    }

    /// Update a category's name, type or budget
    pub fn update(&self, identifier: &str, update: CategoryUpdate) -> BudgetResult<Category> {
        let mut category = self
            .find(identifier)?
            .ok_or_else(|| BudgetError::category_not_found(identifier))?;
        let before = category.clone();

        if let Some(name) = update.name {
            category.name = name.trim().to_string();
        }
        if let Some(category_type) = update.category_type {
            category.category_type = category_type;
        }
        if let Some(budget) = update.budget {
            category.budget = budget;
        }

        category
            .validate()
            .map_err(|e| BudgetError::Validation(e.to_string()))?;

        if category == before {
            return Ok(category);
        }

        self.storage
            .commit(|| self.storage.categories.update(category.clone()))?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;

        Ok(category)
    }

    /// Delete a category
    ///
    /// Its transactions stay in place and show up as unbudgeted.
    pub fn delete(&self, identifier: &str) -> BudgetResult<Category> {
        let category = self
            .find(identifier)?
            .ok_or_else(|| BudgetError::category_not_found(identifier))?;

        self.storage
            .commit(|| self.storage.categories.delete(category.id))?;

        self.storage.log_delete(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::BudgetPaths;
    use crate::models::Transaction;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = BudgetPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage
            .load_all_as_of(NaiveDate::from_ymd_opt(2024, 10, 1).unwrap())
            .unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let category = service
            .create("  Pets ", TransactionType::Expense, Amount::new(80.0))
            .unwrap();
        assert_eq!(category.name, "Pets");
        assert_eq!(service.list().unwrap().len(), 13);
        assert!(storage.is_initialized());
    }

    #[test]
    fn test_create_rejects_invalid_input() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let err = service
            .create("", TransactionType::Expense, Amount::new(10.0))
            .unwrap_err();
        assert!(err.is_validation());

        let err = service
            .create("Pets", TransactionType::Expense, Amount::new(-10.0))
            .unwrap_err();
        assert!(err.is_validation());
        assert_eq!(service.list().unwrap().len(), 12);
    }

    #[test]
    fn test_list_by_type() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        assert_eq!(service.list_by_type(TransactionType::Income).unwrap().len(), 4);
        assert_eq!(service.list_by_type(TransactionType::Expense).unwrap().len(), 8);
    }

    #[test]
    fn test_update_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let updated = service
            .update(
                "food",
                CategoryUpdate {
                    budget: Some(Amount::new(750.0)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Food");
        assert_eq!(updated.budget.value(), 750.0);

        let entries = storage.audit().read_all().unwrap();
        assert_eq!(
            entries.last().unwrap().diff_summary.as_deref(),
            Some("budget: 600.0 -> 750.0")
        );
    }

    #[test]
    fn test_update_missing_category() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        let err = service.update("Travel", CategoryUpdate::default()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_keeps_transactions() {
        let (_temp_dir, storage) = create_test_storage();
        storage
            .transactions
            .insert(Transaction::new(
                NaiveDate::from_ymd_opt(2024, 8, 15).unwrap(),
                "Groceries",
                Amount::new(700.0),
                "Food",
                TransactionType::Expense,
            ))
            .unwrap();

        let service = CategoryService::new(&storage);
        let removed = service.delete("Food").unwrap();
        assert_eq!(removed.name, "Food");

        assert!(service.find("Food").unwrap().is_none());
        assert_eq!(storage.transactions.count().unwrap(), 1);
    }
}
