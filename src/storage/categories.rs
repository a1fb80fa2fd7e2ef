//! Category repository
//!
//! Ordered in-memory category collection with whole-value replacement on
//! every mutation. Names are not required to be unique.

use std::sync::RwLock;

use crate::error::BudgetError;
use crate::models::{Category, CategoryId};

/// Repository for categories, kept in insertion order
#[derive(Default)]
pub struct CategoryRepository {
    categories: RwLock<Vec<Category>>,
}

impl CategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole collection (used when loading a snapshot)
    pub fn replace_all(&self, categories: Vec<Category>) -> Result<(), BudgetError> {
        self.swap(|_| categories)
    }

    /// Get all categories in insertion order
    pub fn get_all(&self) -> Result<Vec<Category>, BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(categories.clone())
    }

    /// Get a category by ID
    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(categories.iter().find(|c| c.id == id).cloned())
    }

    /// Get a category by name
    ///
    /// Exact matches win over case-insensitive ones; among duplicates the
    /// first defined is returned.
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;

        let name = name.trim();
        Ok(categories
            .iter()
            .find(|c| c.name == name)
            .or_else(|| categories.iter().find(|c| c.name.eq_ignore_ascii_case(name)))
            .cloned())
    }

    /// Find a category by name, full UUID or short display ID
    pub fn find(&self, input: &str) -> Result<Option<Category>, BudgetError> {
        if let Some(category) = self.get_by_name(input)? {
            return Ok(Some(category));
        }

        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(categories.iter().find(|c| c.id.matches(input)).cloned())
    }

    /// Append a category
    pub fn insert(&self, category: Category) -> Result<(), BudgetError> {
        self.swap(|current| {
            let mut next = current.to_vec();
            next.push(category);
            next
        })
    }

    /// Replace the category with the same ID in place
    pub fn update(&self, category: Category) -> Result<bool, BudgetError> {
        let mut found = false;
        self.swap(|current| {
            current
                .iter()
                .map(|c| {
                    if c.id == category.id {
                        found = true;
                        category.clone()
                    } else {
                        c.clone()
                    }
                })
                .collect()
        })?;
        Ok(found)
    }

    /// Remove a category, returning it if it existed
    pub fn delete(&self, id: CategoryId) -> Result<Option<Category>, BudgetError> {
        let removed = self.get(id)?;
        if removed.is_some() {
            self.swap(|current| current.iter().filter(|c| c.id != id).cloned().collect())?;
        }
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, BudgetError> {
        let categories = self
            .categories
            .read()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire read lock: {}", e)))?;
        Ok(categories.len())
    }

    fn swap<F>(&self, build: F) -> Result<(), BudgetError>
    where
        F: FnOnce(&[Category]) -> Vec<Category>,
    {
        let mut categories = self
            .categories
            .write()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire write lock: {}", e)))?;
        let next = build(&categories);
        *categories = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_get_by_name() {
        let repo = CategoryRepository::new();
        repo.insert(Category::expense("Food", 600.0)).unwrap();
        repo.insert(Category::income("Salary", 5000.0)).unwrap();

        let food = repo.get_by_name("Food").unwrap().unwrap();
        assert_eq!(food.budget.value(), 600.0);

        let salary = repo.get_by_name("salary").unwrap().unwrap();
        assert_eq!(salary.name, "Salary");

        assert!(repo.get_by_name("Travel").unwrap().is_none());
    }

    #[test]
    fn test_exact_name_wins() {
        let repo = CategoryRepository::new();
        repo.insert(Category::expense("food", 1.0)).unwrap();
        repo.insert(Category::expense("Food", 2.0)).unwrap();

        let found = repo.get_by_name("Food").unwrap().unwrap();
        assert_eq!(found.budget.value(), 2.0);
    }

    #[test]
    fn test_find_by_id() {
        let repo = CategoryRepository::new();
        let category = Category::expense("Utilities", 300.0);
        let short = category.id.to_string();
        repo.insert(category.clone()).unwrap();

        assert_eq!(repo.find(&short).unwrap().unwrap().id, category.id);
        assert_eq!(repo.find("Utilities").unwrap().unwrap().id, category.id);
    }

    #[test]
    fn test_update_and_delete() {
        let repo = CategoryRepository::new();
        let mut category = Category::expense("Food", 600.0);
        repo.insert(category.clone()).unwrap();
        repo.insert(Category::expense("Housing", 1200.0)).unwrap();

        category.name = "Groceries".into();
        assert!(repo.update(category.clone()).unwrap());
        assert_eq!(repo.get_all().unwrap()[0].name, "Groceries");

        let removed = repo.delete(category.id).unwrap().unwrap();
        assert_eq!(removed.name, "Groceries");
        assert_eq!(repo.count().unwrap(), 1);
        assert!(repo.delete(category.id).unwrap().is_none());
    }
}
