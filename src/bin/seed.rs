use chrono::{Duration, Utc};
use clap::Parser;
use fake::{
    faker::{
        lorem::en::{Paragraph, Sentence},
        name::en::Name,
        phone_number::en::PhoneNumber,
    },
    Fake,
};
use rand::Rng;
use uuid::Uuid;

use tablon::{
    auth::{IdentityProvider, LocalIdentityProvider},
    domain::{Announcement, Comment, User},
    repository::{
        AnnouncementRepository, CommentRepository, SqliteAnnouncementRepository,
        SqliteCommentRepository, SqliteUserRepository, UserRepository,
    },
};

/// Fills a Tablon database with demo accounts, announcements and comments.
#[derive(Parser, Debug)]
#[command(name = "seed", about = "Seed the Tablon database with demo data")]
struct Args {
    /// Database URL (falls back to DATABASE_URL)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://tablon.db?mode=rwc")]
    database_url: String,

    /// Number of demo accounts to create
    #[arg(long, default_value_t = 5)]
    users: usize,

    /// Announcements posted by each account
    #[arg(long, default_value_t = 3)]
    announcements_per_user: usize,

    /// Password shared by every demo account
    #[arg(long, default_value = "password123")]
    password: String,

    /// Wipe existing data first
    #[arg(long)]
    reset: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    println!("🌱 Starting database seeding...");

    let db_pool = tablon::connect_database(&args.database_url, 5).await?;

    let identity = LocalIdentityProvider::new(db_pool.clone(), 6);
    let user_repo = SqliteUserRepository::new(db_pool.clone());
    let announcement_repo = SqliteAnnouncementRepository::new(db_pool.clone());
    let comment_repo = SqliteCommentRepository::new(db_pool.clone());

    if args.reset {
        println!("🧹 Clearing existing data...");
        comment_repo.delete_all().await?;
        announcement_repo.delete_all().await?;
        user_repo.delete_all().await?;
        sqlx::query("DELETE FROM credentials").execute(&db_pool).await?;
    }

    println!("👥 Creating accounts...");
    let mut users = Vec::with_capacity(args.users);
    for i in 0..args.users {
        let email = format!("neighbor{}@tablon.local", i + 1);
        let account = match identity.register(&email, &args.password).await {
            Ok(account) => account,
            Err(e) => {
                println!("  ⚠️  Skipping {}: {}", email, e);
                continue;
            }
        };

        let user = User {
            uid: account.uid.clone(),
            display_name: Name().fake(),
            email: account.email.clone(),
            contact_number: Some(PhoneNumber().fake()),
            document_number: None,
            apartment_number: Some(format!("{}{}", i / 4 + 1, ['A', 'B', 'C', 'D'][i % 4])),
            about_me: Some(Sentence(4..10).fake()),
            profile_image_url: None,
        };
        users.push(user_repo.upsert(user).await?);
    }
    println!("  ✅ Created {} accounts (password: {})", users.len(), args.password);

    if users.is_empty() {
        println!("Nothing else to seed.");
        return Ok(());
    }

    println!("📢 Mirroring announcements...");
    let mut rng = rand::thread_rng();
    let now = Utc::now();
    let mut announcements = Vec::new();
    for user in &users {
        for _ in 0..args.announcements_per_user {
            let title: String = Sentence(2..6).fake();
            announcements.push(Announcement {
                id: Uuid::new_v4().to_string(),
                title: title.trim_end_matches('.').to_string(),
                description: Paragraph(1..3).fake(),
                author_id: user.uid.clone(),
                author_email: user.email.clone(),
                author_display_name: user.author_name().to_string(),
                author_profile_image_url: user.profile_image_url.clone(),
                image_url: None,
                timestamp: now - Duration::minutes(rng.gen_range(0..60 * 24 * 14)),
            });
        }
    }
    let announcement_count = announcements.len();

    println!("💬 Mirroring comments...");
    let mut next_id: i64 = sqlx::query_scalar("SELECT COALESCE(MAX(id), 0) FROM comments")
        .fetch_one(&db_pool)
        .await?;
    let mut comments = Vec::new();
    // Every other announcement gets a thread; the rest stay editable by their authors
    for announcement in announcements.iter().step_by(2) {
        for _ in 0..rng.gen_range(1..=4) {
            let author = &users[rng.gen_range(0..users.len())];
            next_id += 1;
            comments.push(Comment {
                id: next_id,
                announcement_id: announcement.id.clone(),
                author_id: author.uid.clone(),
                author_display_name: author.author_name().to_string(),
                author_profile_image_url: author.profile_image_url.clone(),
                text: Sentence(3..12).fake(),
                timestamp: announcement.timestamp + Duration::minutes(rng.gen_range(1..600)),
            });
        }
    }
    let comment_count = comments.len();

    announcement_repo.insert_all(announcements).await?;
    comment_repo.insert_all(comments).await?;
    println!("  ✅ Created {} announcements and {} comments", announcement_count, comment_count);

    println!("🎉 Seeding complete!");
    Ok(())
}
