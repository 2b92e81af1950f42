mod common;

use common::{announcement, at, test_pool, user};
use tablon::{
    domain::{Comment, NewComment},
    error::AppError,
    repository::{
        AnnouncementRepository, CommentRepository, SqliteAnnouncementRepository,
        SqliteCommentRepository, SqliteUserRepository, UserRepository,
    },
};

fn new_comment(announcement_id: &str, author_id: &str, text: &str, minute: u32) -> NewComment {
    NewComment {
        announcement_id: announcement_id.to_string(),
        author_id: author_id.to_string(),
        author_display_name: author_id.to_string(),
        author_profile_image_url: None,
        text: text.to_string(),
        timestamp: at(12, minute),
    }
}

#[tokio::test]
async fn test_user_crud() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteUserRepository::new(pool.clone());

    let mut ana = user("u1", "Ana");
    ana.apartment_number = Some("4B".to_string());
    let created = repo.upsert(ana.clone()).await?;
    assert_eq!(created, ana);

    let found = repo.find_by_id("u1").await?;
    assert_eq!(found.as_ref().map(|u| u.display_name.as_str()), Some("Ana"));

    // Upserting again updates in place
    ana.display_name = "Ana Torres".to_string();
    repo.upsert(ana.clone()).await?;
    let found = repo.find_by_id("u1").await?.unwrap();
    assert_eq!(found.display_name, "Ana Torres");
    assert_eq!(found.apartment_number.as_deref(), Some("4B"));

    ana.about_me = Some("Gardener".to_string());
    let updated = repo.update(ana).await?;
    assert_eq!(updated.about_me.as_deref(), Some("Gardener"));

    let missing = repo.update(user("ghost", "Ghost")).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    repo.delete("u1").await?;
    assert!(repo.find_by_id("u1").await?.is_none());

    Ok(())
}

#[tokio::test]
async fn test_profile_upsert_keeps_announcements() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let users = SqliteUserRepository::new(pool.clone());
    let announcements = SqliteAnnouncementRepository::new(pool.clone());

    let ana = users.upsert(user("u1", "Ana")).await?;
    announcements.insert(announcement("a1", &ana, "Garage sale", at(9, 0))).await?;

    let mut renamed = ana.clone();
    renamed.display_name = "Ana T.".to_string();
    users.upsert(renamed).await?;

    assert_eq!(announcements.list_by_author("u1").await?.len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_announcement_ordering_and_update() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let users = SqliteUserRepository::new(pool.clone());
    let repo = SqliteAnnouncementRepository::new(pool.clone());

    let ana = users.upsert(user("u1", "Ana")).await?;
    let ben = users.upsert(user("u2", "Ben")).await?;

    repo.insert(announcement("a1", &ana, "Oldest", at(8, 0))).await?;
    repo.insert(announcement("a2", &ben, "Newest", at(10, 0))).await?;
    repo.insert(announcement("a3", &ana, "Middle", at(9, 0))).await?;

    let titles: Vec<String> = repo.list_all().await?.into_iter().map(|a| a.title).collect();
    assert_eq!(titles, vec!["Newest", "Middle", "Oldest"]);

    let by_ana: Vec<String> = repo.list_by_author("u1").await?.into_iter().map(|a| a.id).collect();
    assert_eq!(by_ana, vec!["a3", "a1"]);

    let mut edited = repo.find_by_id("a1").await?.unwrap();
    edited.title = "Oldest (edited)".to_string();
    edited.image_url = Some("/uploads/announcement_images/a1.png".to_string());
    let saved = repo.update(edited).await?;
    assert_eq!(saved.title, "Oldest (edited)");
    assert_eq!(saved.timestamp, at(8, 0));

    let missing = repo.update(announcement("nope", &ana, "Nope", at(8, 0))).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));

    Ok(())
}

#[tokio::test]
async fn test_announcement_requires_existing_author() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let repo = SqliteAnnouncementRepository::new(pool.clone());

    let orphan = announcement("a1", &user("ghost", "Ghost"), "Orphan", at(8, 0));
    assert!(repo.insert(orphan).await.is_err());

    Ok(())
}

#[tokio::test]
async fn test_bulk_insert_mirrors_remote_state() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let users = SqliteUserRepository::new(pool.clone());
    let announcements = SqliteAnnouncementRepository::new(pool.clone());
    let comments = SqliteCommentRepository::new(pool.clone());

    let ana = users.upsert(user("u1", "Ana")).await?;
    announcements
        .insert_all(vec![
            announcement("a1", &ana, "First", at(8, 0)),
            announcement("a2", &ana, "Second", at(9, 0)),
        ])
        .await?;

    comments
        .insert_all(vec![
            Comment {
                id: 10,
                announcement_id: "a1".to_string(),
                author_id: "u1".to_string(),
                author_display_name: "Ana".to_string(),
                author_profile_image_url: None,
                text: "Mirrored".to_string(),
                timestamp: at(8, 30),
            },
        ])
        .await?;

    // A second sync with the same ids overwrites rather than duplicates
    let mut refreshed = announcement("a1", &ana, "First (remote edit)", at(8, 0));
    refreshed.description = "Changed remotely".to_string();
    announcements.insert_all(vec![refreshed]).await?;

    let all = announcements.list_all().await?;
    assert_eq!(all.len(), 2);
    let first = announcements.find_by_id("a1").await?.unwrap();
    assert_eq!(first.title, "First (remote edit)");

    // The overwrite must not cascade to the mirrored comment
    assert_eq!(comments.count_for_announcement("a1").await?, 1);
    assert_eq!(comments.find_by_id(10).await?.map(|c| c.text), Some("Mirrored".to_string()));

    Ok(())
}

#[tokio::test]
async fn test_comments_lifecycle() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let users = SqliteUserRepository::new(pool.clone());
    let announcements = SqliteAnnouncementRepository::new(pool.clone());
    let repo = SqliteCommentRepository::new(pool.clone());

    let ana = users.upsert(user("u1", "Ana")).await?;
    users.upsert(user("u2", "Ben")).await?;
    announcements.insert(announcement("a1", &ana, "Lost cat", at(8, 0))).await?;

    let later = repo.insert(new_comment("a1", "u2", "Seen it near the pool", 30)).await?;
    let earlier = repo.insert(new_comment("a1", "u1", "Thanks all", 5)).await?;
    assert!(later.id > 0);
    assert_ne!(later.id, earlier.id);

    let texts: Vec<String> = repo
        .list_for_announcement("a1")
        .await?
        .into_iter()
        .map(|c| c.text)
        .collect();
    assert_eq!(texts, vec!["Thanks all", "Seen it near the pool"]);
    assert_eq!(repo.count_for_announcement("a1").await?, 2);

    let mut edited = later.clone();
    edited.text = "Seen it near the gym".to_string();
    assert_eq!(repo.update(edited).await?.text, "Seen it near the gym");

    repo.delete(earlier.id).await?;
    assert!(repo.find_by_id(earlier.id).await?.is_none());

    assert_eq!(repo.delete_for_announcement("a1").await?, 1);
    assert_eq!(repo.count_for_announcement("a1").await?, 0);

    Ok(())
}

#[tokio::test]
async fn test_delete_without_comments_guard() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let users = SqliteUserRepository::new(pool.clone());
    let announcements = SqliteAnnouncementRepository::new(pool.clone());
    let comments = SqliteCommentRepository::new(pool.clone());

    let ana = users.upsert(user("u1", "Ana")).await?;
    announcements.insert(announcement("quiet", &ana, "Quiet", at(8, 0))).await?;
    announcements.insert(announcement("busy", &ana, "Busy", at(9, 0))).await?;
    comments.insert(new_comment("busy", "u1", "Bump", 0)).await?;

    assert!(!announcements.delete_without_comments("busy").await?);
    assert!(announcements.find_by_id("busy").await?.is_some());

    assert!(announcements.delete_without_comments("quiet").await?);
    assert!(announcements.find_by_id("quiet").await?.is_none());

    assert!(!announcements.delete_without_comments("missing").await?);

    Ok(())
}

#[tokio::test]
async fn test_cascading_deletes() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let users = SqliteUserRepository::new(pool.clone());
    let announcements = SqliteAnnouncementRepository::new(pool.clone());
    let comments = SqliteCommentRepository::new(pool.clone());

    let ana = users.upsert(user("u1", "Ana")).await?;
    let ben = users.upsert(user("u2", "Ben")).await?;
    announcements.insert(announcement("a1", &ana, "By Ana", at(8, 0))).await?;
    announcements.insert(announcement("a2", &ben, "By Ben", at(9, 0))).await?;
    comments.insert(new_comment("a1", "u2", "Ben on Ana's post", 1)).await?;
    comments.insert(new_comment("a2", "u1", "Ana on Ben's post", 2)).await?;

    // Deleting an announcement removes its comments
    announcements.delete("a1").await?;
    assert_eq!(comments.count_for_announcement("a1").await?, 0);

    // Deleting a user removes their announcements and comments
    users.delete("u1").await?;
    assert!(announcements.list_by_author("u1").await?.is_empty());
    assert_eq!(comments.count_for_announcement("a2").await?, 0);
    assert!(announcements.find_by_id("a2").await?.is_some());

    assert_eq!(comments.delete_all().await?, 0);
    assert_eq!(announcements.delete_all().await?, 1);
    assert_eq!(users.delete_all().await?, 1);

    Ok(())
}

#[tokio::test]
async fn test_update_without_comments_guard() -> anyhow::Result<()> {
    let pool = test_pool().await?;
    let users = SqliteUserRepository::new(pool.clone());
    let announcements = SqliteAnnouncementRepository::new(pool.clone());
    let comments = SqliteCommentRepository::new(pool.clone());

    let ana = users.upsert(user("u1", "Ana")).await?;
    announcements.insert(announcement("quiet", &ana, "Quiet", at(8, 0))).await?;
    announcements.insert(announcement("busy", &ana, "Busy", at(9, 0))).await?;
    comments.insert(new_comment("busy", "u1", "Bump", 0)).await?;

    let edited = announcements
        .update_without_comments(announcement("quiet", &ana, "Quiet (edited)", at(8, 0)))
        .await?;
    assert_eq!(edited.map(|a| a.title), Some("Quiet (edited)".to_string()));

    let blocked = announcements
        .update_without_comments(announcement("busy", &ana, "Busy (edited)", at(9, 0)))
        .await?;
    assert!(blocked.is_none());
    assert_eq!(announcements.find_by_id("busy").await?.unwrap().title, "Busy");

    let missing = announcements
        .update_without_comments(announcement("missing", &ana, "Missing", at(9, 0)))
        .await?;
    assert!(missing.is_none());

    Ok(())
}
