//! # In-Memory Store Actor
//!
//! `StoreActor` stands in for the remote admin API. It owns every record of
//! one resource type and answers list/create/update/delete requests one at a
//! time, so the map needs no locking.
//!
//! It follows the backend contract closely enough for the console to run
//! against it unchanged: ids are assigned on create, listing is paginated
//! and searchable, a filter with a scoped path returns the whole scoped set,
//! and duplicates or unknown ids come back as backend errors.

use super::client::StoreClient;
use super::message::StoreRequest;
use crate::api::{ApiError, ListQuery, Page};
use crate::pagination::PaginationInfo;
use crate::schema::{ListFilter, ResourceSchema, StoredResource};
use std::collections::BTreeMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

pub struct StoreActor<R: StoredResource> {
    receiver: mpsc::Receiver<StoreRequest<R>>,
    records: BTreeMap<R::Id, R>,
    next_id: u32,
}

impl<R: StoredResource> StoreActor<R> {
    /// Creates the actor and the client used to reach it.
    pub fn new(buffer_size: usize) -> (Self, StoreClient<R>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: BTreeMap::new(),
            next_id: 1,
        };
        (actor, StoreClient::new(sender))
    }

    /// Runs until every client is dropped.
    pub async fn run(mut self) {
        info!(resource = R::PLURAL, "Store started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                StoreRequest::List { query, respond_to } => {
                    let page = self.list(&query);
                    debug!(resource = R::PLURAL, page = query.page, returned = page.data.len(), "List");
                    let _ = respond_to.send(Ok(page));
                }
                StoreRequest::Create { draft, respond_to } => {
                    if let Some(message) = self.conflict(&draft, None) {
                        warn!(resource = R::PLURAL, %message, "Create rejected");
                        let _ = respond_to.send(Err(ApiError::Backend { status: 409, message }));
                        continue;
                    }
                    let id = R::Id::from(self.next_id);
                    self.next_id += 1;
                    self.records.insert(id.clone(), R::from_draft(id.clone(), draft));
                    info!(resource = R::PLURAL, %id, size = self.records.len(), "Created");
                    let _ = respond_to.send(Ok(id));
                }
                StoreRequest::Update { id, draft, respond_to } => {
                    if let Some(message) = self.conflict(&draft, Some(&id)) {
                        warn!(resource = R::PLURAL, %id, %message, "Update rejected");
                        let _ = respond_to.send(Err(ApiError::Backend { status: 409, message }));
                        continue;
                    }
                    match self.records.get_mut(&id) {
                        Some(record) => {
                            record.apply_draft(draft);
                            info!(resource = R::PLURAL, %id, "Updated");
                            let _ = respond_to.send(Ok(record.clone()));
                        }
                        None => {
                            warn!(resource = R::PLURAL, %id, "Not found");
                            let _ = respond_to.send(Err(not_found::<R>()));
                        }
                    }
                }
                StoreRequest::Delete { id, respond_to } => {
                    if self.records.remove(&id).is_some() {
                        info!(resource = R::PLURAL, %id, size = self.records.len(), "Deleted");
                        let _ = respond_to.send(Ok(()));
                    } else {
                        warn!(resource = R::PLURAL, %id, "Not found");
                        let _ = respond_to.send(Err(not_found::<R>()));
                    }
                }
            }
        }

        info!(resource = R::PLURAL, size = self.records.len(), "Store shutdown");
    }

    fn list(&self, query: &ListQuery<R::Filter>) -> Page<R> {
        let in_scope = self.records.values().filter(|r| r.in_scope(&query.filter));

        if query.filter.scoped_path(R::ENDPOINT).is_some() {
            return Page::scoped(in_scope.cloned().collect());
        }

        let matching: Vec<&R> = match query.search_term() {
            Some(term) => in_scope.filter(|r| r.matches_search(term)).collect(),
            None => in_scope.collect(),
        };
        let limit = query.limit.max(1) as usize;
        let offset = (query.page.max(1) as usize - 1) * limit;
        Page {
            data: matching.iter().skip(offset).take(limit).map(|r| (*r).clone()).collect(),
            pagination: PaginationInfo::for_total(query.page, matching.len() as u64, query.limit),
        }
    }

    fn conflict(&self, draft: &R::Draft, editing: Option<&R::Id>) -> Option<String> {
        self.records
            .values()
            .filter(|r| Some(r.id()) != editing)
            .find_map(|r| r.conflict_with(draft))
    }
}

fn not_found<R: ResourceSchema>() -> ApiError {
    ApiError::Backend {
        status: 404,
        message: format!("{} not found", R::LABEL),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ResourceApi;
    use crate::fixtures::{valid_draft, BuildingFilter, Room};

    async fn seeded(count: usize) -> StoreClient<Room> {
        let (actor, client) = StoreActor::<Room>::new(16);
        tokio::spawn(actor.run());
        for i in 0..count {
            client.insert(valid_draft(&format!("R{i:03}"))).await.unwrap();
        }
        client
    }

    #[tokio::test]
    async fn test_twenty_five_records_page_two() {
        let client = seeded(25).await;
        let page = client
            .list(&ListQuery {
                page: 2,
                ..ListQuery::default()
            })
            .await
            .unwrap();

        assert_eq!(page.data.len(), 10);
        assert_eq!(page.data[0].id.0, 11);
        assert_eq!(page.data[9].id.0, 20);
        assert_eq!(page.pagination.total_pages, 3);
        assert!(page.pagination.has_prev && page.pagination.has_next);
    }

    #[tokio::test]
    async fn test_search_and_scope() {
        let client = seeded(0).await;
        let mut lab = valid_draft("LAB");
        lab.name = "Chemistry lab".into();
        lab.building = Some(2);
        client.create(&lab).await.unwrap();
        client.create(&valid_draft("AUD")).await.unwrap();

        let searched = client
            .list(&ListQuery {
                search: "chem".into(),
                ..ListQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(searched.data.len(), 1);
        assert_eq!(searched.pagination.total_count, 1);

        let scoped = client
            .list(&ListQuery {
                filter: BuildingFilter { building: Some(2) },
                ..ListQuery::default()
            })
            .await
            .unwrap();
        assert_eq!(scoped.data.len(), 1);
        assert_eq!(scoped.pagination, PaginationInfo::single_page(1));
    }

    #[tokio::test]
    async fn test_duplicates_and_missing_ids_are_backend_errors() {
        let client = seeded(0).await;
        let id = client.insert(valid_draft("LAB")).await.unwrap();

        let dup = client.create(&valid_draft("lab")).await.unwrap_err();
        assert_eq!(dup.user_message("Failed to save room"), "Room with code LAB already exists");

        client.update(&id, &valid_draft("LAB")).await.unwrap();
        client.remove(&id).await.unwrap();
        let gone = client.remove(&id).await.unwrap_err();
        assert_eq!(gone.user_message("Failed to delete room"), "Room not found");
    }
}
