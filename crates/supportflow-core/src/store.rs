//! The authoritative in-memory entity store.
//!
//! All mutation goes through here: lifecycle transitions replace ticket
//! values, the notification dispatcher reacts to assignment changes, and
//! each touched collection is handed to the persistence adapter afterwards.
//! Persistence is fire-and-forget: a failed save is logged and swallowed,
//! never rolling back the in-memory mutation.

use tracing::{debug, warn};

use crate::error::{Entity, Error};
use crate::lifecycle::{self, CreateTicketInput, TICKET_ID_FLOOR};
use crate::model::{
    AppNotification, KbArticle, OutboxMessage, Priority, Role, Status, Ticket, User,
};
use crate::notify;
use crate::persist::{NoPersistence, Persistence};
use crate::seed::SeedData;

pub struct Store {
    users: Vec<User>,
    tickets: Vec<Ticket>,
    articles: Vec<KbArticle>,
    outbox: Vec<OutboxMessage>,
    notifications: Vec<AppNotification>,
    persistence: Box<dyn Persistence>,
    next_ticket_id: u64,
    next_message_id: u64,
    next_note_id: u64,
    next_article_id: u64,
    next_outbox_id: u64,
    next_notification_id: u64,
}

fn next_id<T>(items: &[T], id_of: impl Fn(&T) -> u64) -> u64 {
    items.iter().map(id_of).max().map_or(1, |max| max + 1)
}

impl Store {
    /// Build a store from persisted collections, falling back to the seed
    /// for any collection the adapter reports absent.
    #[must_use]
    pub fn init(seed: SeedData, persistence: Box<dyn Persistence>) -> Self {
        let users = persistence.load_users().unwrap_or(seed.users);
        let mut tickets = persistence.load_tickets().unwrap_or(seed.tickets);
        let articles = persistence.load_articles().unwrap_or(seed.articles);
        let outbox = persistence.load_outbox().unwrap_or(seed.outbox);
        let notifications = persistence
            .load_notifications()
            .unwrap_or(seed.notifications);

        tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));

        // High-water mark: ids stay monotonic for the session even when the
        // highest-numbered ticket is deleted later.
        let next_ticket_id = tickets
            .iter()
            .map(|t| t.id)
            .max()
            .map_or(TICKET_ID_FLOOR, |max| max + 1);
        let next_message_id = next_id(
            &tickets
                .iter()
                .flat_map(|t| &t.messages)
                .collect::<Vec<_>>(),
            |m| m.id,
        );
        let next_note_id = next_id(
            &tickets.iter().flat_map(|t| &t.notes).collect::<Vec<_>>(),
            |n| n.id,
        );
        let next_article_id = next_id(&articles, |a| a.id);
        let next_outbox_id = next_id(&outbox, |o| o.id);
        let next_notification_id = next_id(&notifications, |n| n.id);

        Self {
            users,
            tickets,
            articles,
            outbox,
            notifications,
            persistence,
            next_ticket_id,
            next_message_id,
            next_note_id,
            next_article_id,
            next_outbox_id,
            next_notification_id,
        }
    }

    /// Seed-only store with no durability. Used by tests and demos.
    #[must_use]
    pub fn in_memory(seed: SeedData) -> Self {
        Self::init(seed, Box::new(NoPersistence))
    }

    // ----- reads ----------------------------------------------------------

    #[must_use]
    pub fn users(&self) -> &[User] {
        &self.users
    }

    /// Tickets in listing order: `updated_at` descending, stable under ties.
    #[must_use]
    pub fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    #[must_use]
    pub fn articles(&self) -> &[KbArticle] {
        &self.articles
    }

    #[must_use]
    pub fn outbox(&self) -> &[OutboxMessage] {
        &self.outbox
    }

    #[must_use]
    pub fn notifications(&self) -> &[AppNotification] {
        &self.notifications
    }

    /// Quiet lookup for list-rendering contexts.
    #[must_use]
    pub fn find_ticket(&self, id: u64) -> Option<&Ticket> {
        self.tickets.iter().find(|t| t.id == id)
    }

    /// Loud lookup for explicit operations.
    pub fn ticket(&self, id: u64) -> Result<&Ticket, Error> {
        self.find_ticket(id)
            .ok_or(Error::not_found(Entity::Ticket, id))
    }

    #[must_use]
    pub fn find_user(&self, id: u64) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    pub fn user(&self, id: u64) -> Result<&User, Error> {
        self.find_user(id).ok_or(Error::not_found(Entity::User, id))
    }

    #[must_use]
    pub fn find_article(&self, id: u64) -> Option<&KbArticle> {
        self.articles.iter().find(|a| a.id == id)
    }

    pub fn article(&self, id: u64) -> Result<&KbArticle, Error> {
        self.find_article(id)
            .ok_or(Error::not_found(Entity::Article, id))
    }

    // ----- ticket lifecycle ----------------------------------------------

    /// Create a ticket from validated input. Ids are monotonic and never
    /// reused; an empty collection starts at the fixed floor.
    pub fn create_ticket(&mut self, input: &CreateTicketInput) -> Result<Ticket, Error> {
        let id = self.next_ticket_id;
        let ticket = lifecycle::create(input, id, self.take_message_id(), chrono::Utc::now())?;
        self.next_ticket_id += 1;
        debug!(ticket = id, subject = %ticket.subject, "ticket created");
        self.tickets.insert(0, ticket.clone());
        self.resort_tickets();
        self.persist_tickets();
        Ok(ticket)
    }

    /// Append an agent reply: status becomes `Answered` unconditionally and
    /// exactly one outbox record is produced for the requester.
    pub fn append_reply(
        &mut self,
        ticket_id: u64,
        body: &str,
        author_id: u64,
    ) -> Result<Ticket, Error> {
        if body.trim().is_empty() {
            return Err(Error::Validation("reply body is required".to_string()));
        }
        let author = self.user(author_id)?.clone();
        let index = self.ticket_index(ticket_id)?;
        let now = chrono::Utc::now();
        let message_id = self.take_message_id();
        let updated = self.tickets[index].with_reply(message_id, body, &author, now);

        let outbox_id = self.take_outbox_id();
        self.outbox.push(OutboxMessage {
            id: outbox_id,
            to_email: updated.requester_email.clone(),
            content: body.to_string(),
            sent_at: now,
        });

        self.tickets[index] = updated.clone();
        self.resort_tickets();
        self.persist_tickets();
        self.persist_outbox();
        Ok(updated)
    }

    /// Append an internal note. Status unchanged, nothing sent outbound.
    pub fn append_note(
        &mut self,
        ticket_id: u64,
        body: &str,
        author_id: u64,
    ) -> Result<Ticket, Error> {
        if body.trim().is_empty() {
            return Err(Error::Validation("note body is required".to_string()));
        }
        let author = self.user(author_id)?.clone();
        let index = self.ticket_index(ticket_id)?;
        let note_id = self.take_note_id();
        let updated = self.tickets[index].with_note(note_id, body, &author, chrono::Utc::now());
        self.tickets[index] = updated.clone();
        self.resort_tickets();
        self.persist_tickets();
        Ok(updated)
    }

    pub fn set_status(&mut self, ticket_id: u64, status: Status) -> Result<Ticket, Error> {
        let index = self.ticket_index(ticket_id)?;
        let updated = self.tickets[index].with_status(status, chrono::Utc::now());
        self.tickets[index] = updated.clone();
        self.resort_tickets();
        self.persist_tickets();
        Ok(updated)
    }

    pub fn set_priority(&mut self, ticket_id: u64, priority: Priority) -> Result<Ticket, Error> {
        let index = self.ticket_index(ticket_id)?;
        let updated = self.tickets[index].with_priority(priority, chrono::Utc::now());
        self.tickets[index] = updated.clone();
        self.resort_tickets();
        self.persist_tickets();
        Ok(updated)
    }

    /// Change or clear the assignee. The dispatcher decides whether the
    /// change notifies the new assignee.
    pub fn set_assignee(
        &mut self,
        ticket_id: u64,
        assignee: Option<u64>,
    ) -> Result<Ticket, Error> {
        if let Some(user_id) = assignee {
            self.user(user_id)?;
        }
        let index = self.ticket_index(ticket_id)?;
        let previous = self.tickets[index].assigned_id;
        let now = chrono::Utc::now();
        let updated = self.tickets[index].with_assignee(assignee, now);

        if let Some(notification) =
            notify::on_assignee_changed(&updated, previous, assignee, self.next_notification_id, now)
        {
            self.next_notification_id += 1;
            debug!(ticket = ticket_id, user = notification.user_id, "assignment notification");
            self.notifications.insert(0, notification);
            self.persist_notifications();
        }

        self.tickets[index] = updated.clone();
        self.resort_tickets();
        self.persist_tickets();
        Ok(updated)
    }

    /// Permanently remove a ticket and its embedded messages/notes. Admin
    /// only; a rejected call leaves the collection untouched.
    pub fn delete_ticket(&mut self, ticket_id: u64, actor_role: Role) -> Result<(), Error> {
        if !actor_role.is_admin() {
            return Err(Error::admin_required("delete ticket"));
        }
        let index = self.ticket_index(ticket_id)?;
        self.tickets.remove(index);
        self.persist_tickets();
        Ok(())
    }

    // ----- knowledge base -------------------------------------------------

    pub fn add_article(
        &mut self,
        title: &str,
        body: &str,
        tags: Vec<String>,
        actor_role: Role,
    ) -> Result<KbArticle, Error> {
        if !actor_role.is_admin() {
            return Err(Error::admin_required("create article"));
        }
        if title.trim().is_empty() {
            return Err(Error::Validation("title is required".to_string()));
        }
        if body.trim().is_empty() {
            return Err(Error::Validation("body is required".to_string()));
        }
        let article = KbArticle {
            id: self.take_article_id(),
            title: title.trim().to_string(),
            body: body.to_string(),
            tags,
        };
        self.articles.insert(0, article.clone());
        self.persist_articles();
        Ok(article)
    }

    pub fn update_article(&mut self, article: KbArticle, actor_role: Role) -> Result<(), Error> {
        if !actor_role.is_admin() {
            return Err(Error::admin_required("update article"));
        }
        if article.title.trim().is_empty() {
            return Err(Error::Validation("title is required".to_string()));
        }
        if article.body.trim().is_empty() {
            return Err(Error::Validation("body is required".to_string()));
        }
        let existing = self
            .articles
            .iter_mut()
            .find(|a| a.id == article.id)
            .ok_or(Error::not_found(Entity::Article, article.id))?;
        *existing = article;
        self.persist_articles();
        Ok(())
    }

    pub fn delete_article(&mut self, id: u64, actor_role: Role) -> Result<(), Error> {
        if !actor_role.is_admin() {
            return Err(Error::admin_required("delete article"));
        }
        let index = self
            .articles
            .iter()
            .position(|a| a.id == id)
            .ok_or(Error::not_found(Entity::Article, id))?;
        self.articles.remove(index);
        self.persist_articles();
        Ok(())
    }

    // ----- users ----------------------------------------------------------

    pub fn set_user_role(
        &mut self,
        user_id: u64,
        role: Role,
        actor_role: Role,
    ) -> Result<User, Error> {
        if !actor_role.is_admin() {
            return Err(Error::admin_required("change role"));
        }
        let user = self
            .users
            .iter_mut()
            .find(|u| u.id == user_id)
            .ok_or(Error::not_found(Entity::User, user_id))?;
        user.role = role;
        let updated = user.clone();
        self.persist_users();
        Ok(updated)
    }

    // ----- notifications --------------------------------------------------

    pub fn mark_notification_read(&mut self, id: u64) -> Result<(), Error> {
        if !notify::mark_read(&mut self.notifications, id) {
            return Err(Error::not_found(Entity::Notification, id));
        }
        self.persist_notifications();
        Ok(())
    }

    pub fn mark_all_notifications_read(&mut self, user_id: u64) -> usize {
        let marked = notify::mark_all_read(&mut self.notifications, user_id);
        if marked > 0 {
            self.persist_notifications();
        }
        marked
    }

    #[must_use]
    pub fn unread_count(&self, user_id: u64) -> usize {
        notify::unread_count(&self.notifications, user_id)
    }

    #[must_use]
    pub fn notifications_for(&self, user_id: u64) -> Vec<&AppNotification> {
        notify::for_user(&self.notifications, user_id)
    }

    // ----- internals ------------------------------------------------------

    fn ticket_index(&self, id: u64) -> Result<usize, Error> {
        self.tickets
            .iter()
            .position(|t| t.id == id)
            .ok_or(Error::not_found(Entity::Ticket, id))
    }

    fn resort_tickets(&mut self) {
        // Stable: equal timestamps keep their relative order.
        self.tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    }

    fn take_message_id(&mut self) -> u64 {
        let id = self.next_message_id;
        self.next_message_id += 1;
        id
    }

    fn take_note_id(&mut self) -> u64 {
        let id = self.next_note_id;
        self.next_note_id += 1;
        id
    }

    fn take_article_id(&mut self) -> u64 {
        let id = self.next_article_id;
        self.next_article_id += 1;
        id
    }

    fn take_outbox_id(&mut self) -> u64 {
        let id = self.next_outbox_id;
        self.next_outbox_id += 1;
        id
    }

    fn persist_users(&self) {
        if let Err(err) = self.persistence.save_users(&self.users) {
            warn!(%err, "failed to persist users; in-memory state kept");
        }
    }

    fn persist_tickets(&self) {
        if let Err(err) = self.persistence.save_tickets(&self.tickets) {
            warn!(%err, "failed to persist tickets; in-memory state kept");
        }
    }

    fn persist_articles(&self) {
        if let Err(err) = self.persistence.save_articles(&self.articles) {
            warn!(%err, "failed to persist articles; in-memory state kept");
        }
    }

    fn persist_outbox(&self) {
        if let Err(err) = self.persistence.save_outbox(&self.outbox) {
            warn!(%err, "failed to persist outbox; in-memory state kept");
        }
    }

    fn persist_notifications(&self) {
        if let Err(err) = self.persistence.save_notifications(&self.notifications) {
            warn!(%err, "failed to persist notifications; in-memory state kept");
        }
    }

    /// Force a save of every collection, used when provisioning a fresh
    /// workspace so the seed lands on disk before the first command.
    pub fn persist_all(&self) {
        self.persist_users();
        self.persist_tickets();
        self.persist_articles();
        self.persist_outbox();
        self.persist_notifications();
    }
}

#[cfg(test)]
mod tests {
    use super::Store;
    use crate::error::Error;
    use crate::lifecycle::{CreateTicketInput, TICKET_ID_FLOOR};
    use crate::model::{Priority, Role, Status};
    use crate::persist::Persistence;
    use crate::seed::{self, SeedData};
    use chrono::Utc;

    fn demo_store() -> Store {
        Store::in_memory(seed::demo(Utc::now()))
    }

    fn input(subject: &str) -> CreateTicketInput {
        CreateTicketInput {
            subject: subject.to_string(),
            requester_email: "someone@example.com".to_string(),
            priority: Priority::Medium,
            message: "Something broke.".to_string(),
            requester_name: None,
        }
    }

    #[test]
    fn create_assigns_monotonic_ids() {
        let mut store = demo_store();
        let first = store.create_ticket(&input("First")).unwrap();
        assert_eq!(first.id, TICKET_ID_FLOOR);
        let second = store.create_ticket(&input("Second")).unwrap();
        assert_eq!(second.id, TICKET_ID_FLOOR + 1);
    }

    #[test]
    fn create_uses_floor_on_empty_collection() {
        let mut store = Store::in_memory(SeedData::empty());
        let ticket = store.create_ticket(&input("Fresh")).unwrap();
        assert_eq!(ticket.id, TICKET_ID_FLOOR);
    }

    #[test]
    fn failed_create_leaves_collection_unchanged() {
        let mut store = demo_store();
        let before = store.tickets().len();
        let err = store.create_ticket(&input("   ")).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(store.tickets().len(), before);
    }

    #[test]
    fn new_ticket_lands_at_the_top_of_the_listing() {
        let mut store = demo_store();
        let ticket = store.create_ticket(&input("Newest")).unwrap();
        assert_eq!(store.tickets()[0].id, ticket.id);
    }

    #[test]
    fn reply_answers_and_logs_exactly_one_outbox_record() {
        let mut store = demo_store();
        let outbox_before = store.outbox().len();
        let updated = store
            .append_reply(102, "Please try resetting your session.", 2)
            .unwrap();
        assert_eq!(updated.status, Status::Answered);
        assert_eq!(store.outbox().len(), outbox_before + 1);
        let record = store.outbox().last().unwrap();
        assert_eq!(record.to_email, "jane.doe@marketing-pro.io");
        assert_eq!(record.content, "Please try resetting your session.");
    }

    #[test]
    fn reply_reopens_closed_ticket() {
        let mut store = demo_store();
        let updated = store.append_reply(106, "Reopening per your request.", 3).unwrap();
        assert_eq!(updated.status, Status::Answered);
    }

    #[test]
    fn note_does_not_touch_outbox_or_status() {
        let mut store = demo_store();
        let outbox_before = store.outbox().len();
        let updated = store.append_note(102, "Checked the auth logs.", 2).unwrap();
        assert_eq!(updated.status, Status::Open);
        assert_eq!(store.outbox().len(), outbox_before);
        assert_eq!(updated.notes.len(), 1);
    }

    #[test]
    fn assignment_notifies_once_per_change() {
        let mut store = demo_store();
        let before = store.notifications().len();

        // 105 is assigned to user 2; handing off to 3 notifies 3.
        store.set_assignee(105, Some(3)).unwrap();
        assert_eq!(store.notifications().len(), before + 1);
        let fired = &store.notifications()[0];
        assert_eq!(fired.user_id, 3);
        assert_eq!(fired.ticket_id, Some(105));

        // Re-assigning the same user is silent.
        store.set_assignee(105, Some(3)).unwrap();
        assert_eq!(store.notifications().len(), before + 1);

        // Clearing is silent too.
        store.set_assignee(105, None).unwrap();
        assert_eq!(store.notifications().len(), before + 1);
    }

    #[test]
    fn assigning_unknown_user_fails_loudly() {
        let mut store = demo_store();
        let err = store.set_assignee(105, Some(999)).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn delete_requires_admin() {
        let mut store = demo_store();
        let before = store.tickets().to_vec();
        let err = store.delete_ticket(101, Role::Agent).unwrap_err();
        assert!(matches!(err, Error::Authorization { .. }));
        assert_eq!(store.tickets(), before.as_slice());

        store.delete_ticket(101, Role::Admin).unwrap();
        assert!(store.find_ticket(101).is_none());
    }

    #[test]
    fn deleted_ticket_ids_are_not_reused() {
        let mut store = demo_store();
        // 106 holds the highest seeded id; deleting it must not recycle it.
        store.delete_ticket(106, Role::Admin).unwrap();
        let ticket = store.create_ticket(&input("After delete")).unwrap();
        assert_eq!(ticket.id, TICKET_ID_FLOOR);
        assert!(store.find_ticket(106).is_none());
    }

    #[test]
    fn kb_mutations_are_admin_gated() {
        let mut store = demo_store();
        let err = store
            .add_article("VPN Setup", "Use the gateway.", vec![], Role::Agent)
            .unwrap_err();
        assert!(matches!(err, Error::Authorization { .. }));

        let article = store
            .add_article("VPN Setup", "Use the gateway.", vec!["network".into()], Role::Admin)
            .unwrap();
        assert_eq!(article.id, 5);

        let mut edited = article.clone();
        edited.body = "Use the new gateway.".to_string();
        store.update_article(edited, Role::Admin).unwrap();
        assert_eq!(store.article(article.id).unwrap().body, "Use the new gateway.");

        store.delete_article(article.id, Role::Admin).unwrap();
        assert!(store.find_article(article.id).is_none());
    }

    #[test]
    fn role_change_is_admin_gated() {
        let mut store = demo_store();
        let err = store.set_user_role(3, Role::Admin, Role::Agent).unwrap_err();
        assert!(matches!(err, Error::Authorization { .. }));

        let updated = store.set_user_role(3, Role::Admin, Role::Admin).unwrap();
        assert_eq!(updated.role, Role::Admin);
    }

    #[test]
    fn mark_all_read_is_idempotent_and_scoped() {
        let mut store = demo_store();
        let others_unread = store.unread_count(3);
        assert!(store.unread_count(2) > 0);

        let marked = store.mark_all_notifications_read(2);
        assert!(marked > 0);
        assert_eq!(store.unread_count(2), 0);
        assert_eq!(store.unread_count(3), others_unread);

        assert_eq!(store.mark_all_notifications_read(2), 0);
    }

    #[test]
    fn updated_at_invariant_holds_after_every_operation() {
        let mut store = demo_store();
        store.append_reply(101, "Looking into it.", 1).unwrap();
        store.set_status(103, Status::Closed).unwrap();
        store.set_priority(104, Priority::High).unwrap();
        store.set_assignee(102, Some(1)).unwrap();
        for ticket in store.tickets() {
            assert!(ticket.updated_at >= ticket.created_at, "ticket {}", ticket.id);
        }
    }

    struct FailingPersistence;

    impl Persistence for FailingPersistence {
        fn load_users(&self) -> Option<Vec<crate::model::User>> {
            None
        }
        fn load_tickets(&self) -> Option<Vec<crate::model::Ticket>> {
            None
        }
        fn load_articles(&self) -> Option<Vec<crate::model::KbArticle>> {
            None
        }
        fn load_outbox(&self) -> Option<Vec<crate::model::OutboxMessage>> {
            None
        }
        fn load_notifications(&self) -> Option<Vec<crate::model::AppNotification>> {
            None
        }
        fn save_users(&self, _: &[crate::model::User]) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
        fn save_tickets(&self, _: &[crate::model::Ticket]) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
        fn save_articles(&self, _: &[crate::model::KbArticle]) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
        fn save_outbox(&self, _: &[crate::model::OutboxMessage]) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
        fn save_notifications(&self, _: &[crate::model::AppNotification]) -> anyhow::Result<()> {
            anyhow::bail!("disk full")
        }
    }

    #[test]
    fn persistence_failure_does_not_roll_back() {
        let mut store = Store::init(seed::demo(Utc::now()), Box::new(FailingPersistence));
        let ticket = store.create_ticket(&input("Survives disk failure")).unwrap();
        assert!(store.find_ticket(ticket.id).is_some());
    }
}
