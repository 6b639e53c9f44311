use std::{
    io::{self, BufRead, Write},
    process::ExitCode,
    sync::Arc,
};

use folio::{
    application::{
        blog::Blog,
        error::AppError,
        posts::{CreatePostCommand, View},
        repos::KvStore,
    },
    config::{self, Command, CreateArgs, ListArgs},
    domain::posts::ISO_DATE_FORMAT,
    infra::{error::InfraError, kv::FileStore, telemetry},
    presentation::{
        PendingViews,
        views::{ArchiveView, IndexView},
    },
};
use time::OffsetDateTime;
use tracing::{Dispatch, Level, dispatcher, error};
use tracing_subscriber::fmt as tracing_fmt;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(code) => code,
        Err(error) => {
            report_application_error(&error);
            eprintln!("{}", error.presentation_message());
            ExitCode::FAILURE
        }
    }
}

fn report_application_error(error: &AppError) {
    if dispatcher::has_been_set() {
        error!(error = %error, "application error");
        return;
    }

    let subscriber = tracing_fmt()
        .with_max_level(Level::ERROR)
        .with_writer(io::stderr)
        .finish();
    let dispatch = Dispatch::new(subscriber);
    dispatcher::with_default(&dispatch, || {
        error!(error = %error, "application error");
    });
}

async fn run() -> Result<ExitCode, AppError> {
    let (cli_args, settings) = config::load_with_cli()?;
    telemetry::init(&settings.logging)?;

    let command = cli_args
        .command
        .unwrap_or(Command::List(ListArgs::default()));

    let store: Arc<dyn KvStore> = Arc::new(FileStore::new(settings.storage.data_file.clone()));
    let views = Arc::new(PendingViews::default());
    let blog = Blog::open(store, views.clone()).await?;

    match command {
        Command::List(args) => print_index(&blog, args.full).await?,
        Command::Pinned(args) => print_archive(&blog, args.full).await?,
        Command::Login(args) => {
            if !blog.credentials.login(&args.username, &args.password).await? {
                println!("Bad credentials.");
                return Ok(ExitCode::FAILURE);
            }
            println!("Logged in!");
        }
        Command::Logout => {
            blog.credentials.logout().await?;
            println!("Logged out.");
        }
        Command::Status => {
            let state = if blog.credentials.is_admin().await? {
                "admin"
            } else {
                "anonymous"
            };
            println!("{state}");
        }
        Command::Create(args) => {
            let post = blog.posts.create_post(create_command(args)?).await?;
            println!("Created post #{}.", post.id);
        }
        Command::Delete(args) => {
            blog.posts.ensure_admin("posts::delete").await?;
            if !args.yes && !confirm("Delete this post?")? {
                println!("Cancelled.");
                return Ok(ExitCode::SUCCESS);
            }
            blog.posts.delete_post(args.id).await?;
            println!("Deleted post #{}.", args.id);
        }
        Command::Pin(args) => {
            blog.posts.pin(args.id).await?;
            println!("Pinned post #{}.", args.id);
        }
        Command::Unpin(args) => {
            blog.posts.unpin(args.id).await?;
            println!("Unpinned post #{}.", args.id);
        }
        Command::Password(args) => {
            if !blog.credentials.is_admin().await? {
                return Err(AppError::AccessDenied);
            }
            blog.credentials
                .change_password(&args.current, &args.new, &args.confirm)
                .await?;
            println!("Password updated successfully.");
        }
    }

    for view in views.take() {
        println!();
        match view {
            View::Index => print_index(&blog, false).await?,
            View::Archive => print_archive(&blog, false).await?,
        }
    }

    Ok(ExitCode::SUCCESS)
}

async fn print_index(blog: &Blog, full: bool) -> Result<(), AppError> {
    let posts = blog.posts.list_all().await?;
    let admin = blog.credentials.is_admin().await?;
    print!(
        "{}",
        IndexView {
            posts: &posts,
            admin,
            full,
        }
    );
    Ok(())
}

async fn print_archive(blog: &Blog, full: bool) -> Result<(), AppError> {
    let posts = blog.posts.list_pinned().await?;
    print!("{}", ArchiveView { posts: &posts, full });
    Ok(())
}

fn create_command(args: CreateArgs) -> Result<CreatePostCommand, AppError> {
    let date = match args.date {
        Some(date) => date,
        None => OffsetDateTime::now_utc()
            .date()
            .format(ISO_DATE_FORMAT)
            .map_err(|err| AppError::unexpected(format!("failed to format today: {err}")))?,
    };

    Ok(CreatePostCommand {
        title: args.title,
        date,
        video: args.video,
        excerpt: args.excerpt,
        content: args.content,
    })
}

fn confirm(prompt: &str) -> Result<bool, InfraError> {
    print!("{prompt} [y/N] ");
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim();
    Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
}
