//! In-memory favourites storage with the same semantics as the Diesel
//! adapters: serial list ids, `(list, product)` uniqueness and cascading list
//! deletes.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::ports::{
    FavoriteItemRepository, FavoriteItemRepositoryError, FavoriteListRepository,
    FavoriteListRepositoryError, OwnershipStore, OwnershipStoreError,
};
use crate::domain::{
    FavoriteItem, FavoriteList, ListId, ListName, ListOwner, NewFavoriteItem, NewFavoriteList,
    ProductId, UserId,
};

#[derive(Default)]
struct StoreState {
    last_id: i32,
    lists: BTreeMap<ListId, FavoriteList>,
    items: BTreeMap<(ListId, ProductId), FavoriteItem>,
}

/// Lists and items held in process memory.
///
/// Share one instance (behind `Arc`) between every port it implements.
#[derive(Default)]
pub struct InMemoryFavoritesStore {
    state: Mutex<StoreState>,
}

impl InMemoryFavoritesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a list with `list_id` is stored.
    pub fn contains_list(&self, list_id: ListId) -> bool {
        self.lock().lists.contains_key(&list_id)
    }

    /// Number of items stored for `list_id`.
    pub fn item_count(&self, list_id: ListId) -> usize {
        self.lock()
            .items
            .keys()
            .filter(|(owner, _)| *owner == list_id)
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl FavoriteListRepository for InMemoryFavoritesStore {
    async fn lists_for_user(
        &self,
        owner: UserId,
    ) -> Result<Vec<FavoriteList>, FavoriteListRepositoryError> {
        Ok(self
            .lock()
            .lists
            .values()
            .filter(|list| list.owner == owner)
            .cloned()
            .collect())
    }

    async fn create(
        &self,
        list: NewFavoriteList,
    ) -> Result<FavoriteList, FavoriteListRepositoryError> {
        let mut state = self.lock();
        state.last_id += 1;
        let id = ListId::new(state.last_id)
            .map_err(|err| FavoriteListRepositoryError::query(err.to_string()))?;
        let stored = FavoriteList {
            id,
            name: list.name,
            owner: list.owner,
            created_at: Utc::now(),
        };
        state.lists.insert(id, stored.clone());
        Ok(stored)
    }

    async fn rename(
        &self,
        list_id: ListId,
        name: ListName,
    ) -> Result<FavoriteList, FavoriteListRepositoryError> {
        let mut state = self.lock();
        let list = state
            .lists
            .get_mut(&list_id)
            .ok_or_else(|| FavoriteListRepositoryError::not_found(list_id))?;
        list.name = name;
        Ok(list.clone())
    }

    async fn delete(&self, list_id: ListId) -> Result<(), FavoriteListRepositoryError> {
        let mut state = self.lock();
        state
            .lists
            .remove(&list_id)
            .ok_or_else(|| FavoriteListRepositoryError::not_found(list_id))?;
        state.items.retain(|(owner, _), _| *owner != list_id);
        Ok(())
    }
}

#[async_trait]
impl FavoriteItemRepository for InMemoryFavoritesStore {
    async fn items_for_list(
        &self,
        list_id: ListId,
    ) -> Result<Vec<FavoriteItem>, FavoriteItemRepositoryError> {
        Ok(self
            .lock()
            .items
            .values()
            .filter(|item| item.list_id == list_id)
            .copied()
            .collect())
    }

    async fn create(
        &self,
        item: NewFavoriteItem,
    ) -> Result<FavoriteItem, FavoriteItemRepositoryError> {
        let mut state = self.lock();
        if !state.lists.contains_key(&item.list_id) {
            return Err(FavoriteItemRepositoryError::query(
                "referenced record does not exist",
            ));
        }
        let key = (item.list_id, item.product_id);
        if state.items.contains_key(&key) {
            return Err(FavoriteItemRepositoryError::conflict(
                item.list_id,
                item.product_id,
            ));
        }
        let stored = FavoriteItem {
            list_id: item.list_id,
            product_id: item.product_id,
            created_at: Utc::now(),
        };
        state.items.insert(key, stored);
        Ok(stored)
    }

    async fn delete(
        &self,
        list_id: ListId,
        product_id: ProductId,
    ) -> Result<(), FavoriteItemRepositoryError> {
        self.lock()
            .items
            .remove(&(list_id, product_id))
            .map(|_| ())
            .ok_or_else(|| FavoriteItemRepositoryError::not_found(list_id, product_id))
    }

    async fn delete_for_list(&self, list_id: ListId) -> Result<usize, FavoriteItemRepositoryError> {
        let mut state = self.lock();
        let before = state.items.len();
        state.items.retain(|(owner, _), _| *owner != list_id);
        Ok(before - state.items.len())
    }
}

#[async_trait]
impl OwnershipStore for InMemoryFavoritesStore {
    async fn list_owner(&self, list_id: ListId) -> Result<ListOwner, OwnershipStoreError> {
        self.lock()
            .lists
            .get(&list_id)
            .map(|list| ListOwner {
                list_id,
                owner: list.owner,
            })
            .ok_or_else(|| OwnershipStoreError::not_found(list_id))
    }
}
