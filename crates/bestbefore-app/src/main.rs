use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context as _, Result, anyhow};
use clap::{Arg, ArgAction, Command, value_parser};
use tracing::warn;

use bestbefore_app::context::{AppContext, Config};
use bestbefore_app::screens::hallway::HallwayScreen;
use bestbefore_app::screens::login::LoginScreen;
use bestbefore_app::screens::profile::ProfileScreen;
use bestbefore_app::screens::room::{FrameSlot, RoomScreen};
use bestbefore_app::screens::signup::SignupScreen;
use bestbefore_capsule::countdown::LockOffset;
use bestbefore_types::api::CreateRoomRequest;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bestbefore=debug,warn".into()),
        )
        .init();

    let cli = Command::new("bestbefore")
        .version("0.1.0")
        .about("BestBefore time-capsule photo rooms")
        .arg_required_else_help(true)
        .subcommand(
            Command::new("signup")
                .about("Create an account")
                .arg(Arg::new("name").long("name").required(true))
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(
            Command::new("login")
                .about("Log in and cache the session")
                .arg(Arg::new("email").long("email").required(true))
                .arg(Arg::new("password").long("password").required(true)),
        )
        .subcommand(Command::new("logout").about("Clear the cached session"))
        .subcommand(
            Command::new("rooms").about("List rooms").arg(
                Arg::new("saved")
                    .long("saved")
                    .action(ArgAction::SetTrue)
                    .help("List saved rooms instead of all rooms"),
            ),
        )
        .subcommand(
            Command::new("create-room")
                .about("Create a room")
                .arg(Arg::new("name").long("name").required(true))
                .arg(
                    Arg::new("public")
                        .long("public")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("collaboration")
                        .long("collaboration")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("days")
                        .long("days")
                        .default_value("21")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("hours")
                        .long("hours")
                        .default_value("0")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("minutes")
                        .long("minutes")
                        .default_value("0")
                        .value_parser(value_parser!(u32)),
                ),
        )
        .subcommand(
            Command::new("rename-room")
                .about("Rename a room")
                .arg(Arg::new("id").long("id").required(true))
                .arg(Arg::new("name").long("name").required(true)),
        )
        .subcommand(
            Command::new("delete-room")
                .about("Delete a room")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(
            Command::new("keep-room")
                .about("Bookmark a room into the saved list")
                .arg(Arg::new("id").long("id").required(true)),
        )
        .subcommand(
            Command::new("upload-photo")
                .about("Attach a photo to a room frame")
                .arg(Arg::new("room").long("room").required(true))
                .arg(
                    Arg::new("file")
                        .long("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf)),
                ),
        )
        .subcommand(
            Command::new("capsule")
                .about("Start a time capsule lock on a room")
                .arg(Arg::new("room").long("room").required(true))
                .arg(
                    Arg::new("hours")
                        .long("hours")
                        .default_value("0")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("minutes")
                        .long("minutes")
                        .default_value("0")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("seconds")
                        .long("seconds")
                        .default_value("0")
                        .value_parser(value_parser!(u32)),
                )
                .arg(
                    Arg::new("watch")
                        .long("watch")
                        .action(ArgAction::SetTrue)
                        .help("Stay attached and print the countdown until it unlocks"),
                ),
        )
        .subcommand(
            Command::new("calendar").about("Calendar integration").arg(
                Arg::new("auth")
                    .long("auth")
                    .action(ArgAction::SetTrue)
                    .help("Print the calendar authorization URL instead of events"),
            ),
        )
        .subcommand(
            Command::new("profile")
                .about("Show or update profile and preferences")
                .arg(Arg::new("set-theme").long("set-theme"))
                .arg(Arg::new("set-accent").long("set-accent").help("ARGB hex, e.g. FF007AFF"))
                .arg(Arg::new("set-email").long("set-email"))
                .arg(Arg::new("set-password").long("set-password")),
        );

    let matches = cli.get_matches();
    let ctx = AppContext::new(&Config::from_env())?;

    match matches.subcommand() {
        Some(("signup", args)) => {
            let mut screen = SignupScreen::new();
            screen.update_name(args.get_one::<String>("name").unwrap());
            screen.update_email(args.get_one::<String>("email").unwrap());
            screen.update_password(args.get_one::<String>("password").unwrap());

            match screen.attempt_signup(&ctx).await {
                Some(session) => println!("Signed up as {} <{}>", session.user_name, session.user_email),
                None => return Err(anyhow!(screen.error_message.unwrap_or_default())),
            }
        }
        Some(("login", args)) => {
            let mut screen = LoginScreen::new();
            screen.begin_email_entry();
            screen.update_email(args.get_one::<String>("email").unwrap());
            screen.advance_to_password();
            screen.update_password(args.get_one::<String>("password").unwrap());

            match screen.attempt_login(&ctx).await {
                Some(session) => println!("Logged in as {}", session.user_name),
                None => return Err(anyhow!(screen.error_message.unwrap_or_default())),
            }
        }
        Some(("logout", _)) => {
            ctx.store.clear_session()?;
            println!("Logged out");
        }
        Some(("rooms", args)) => {
            let session = ctx.require_session()?;
            let mut screen = HallwayScreen::new();
            if args.get_flag("saved") {
                screen.refresh_saved(&ctx, &session).await;
            } else {
                screen.refresh(&ctx, &session).await;
            }
            if let Some(msg) = screen.error_message {
                return Err(anyhow!(msg));
            }
            for room in &screen.cards {
                let lock = match room.unlock_at {
                    Some(at) => format!("locked until {at}"),
                    None => "unlocked".to_string(),
                };
                println!(
                    "{}  {}  [{}{}] {}",
                    room.id,
                    room.name,
                    if room.is_public { "public" } else { "private" },
                    if room.is_collaboration { ", collab" } else { "" },
                    lock
                );
            }
        }
        Some(("create-room", args)) => {
            let session = ctx.require_session()?;
            let req = CreateRoomRequest {
                name: args.get_one::<String>("name").unwrap().clone(),
                is_public: args.get_flag("public"),
                is_collaboration: args.get_flag("collaboration"),
                capsule_duration_days: *args.get_one::<u32>("days").unwrap(),
                capsule_duration_hours: *args.get_one::<u32>("hours").unwrap(),
                capsule_duration_minutes: *args.get_one::<u32>("minutes").unwrap(),
                unlock_date: None,
            };
            let id = ctx.client.create_room(&session.token, &req).await?;
            println!("Created room {id}");
        }
        Some(("rename-room", args)) => {
            let session = ctx.require_session()?;
            let id = args.get_one::<String>("id").unwrap();
            let name = args.get_one::<String>("name").unwrap();
            ctx.client.rename_room(&session.token, id, name).await?;
            println!("Renamed {id} to {name}");
        }
        Some(("delete-room", args)) => {
            let session = ctx.require_session()?;
            let id = args.get_one::<String>("id").unwrap();
            ctx.client.delete_room(&session.token, id).await?;
            println!("Deleted {id}");
        }
        Some(("keep-room", args)) => {
            let session = ctx.require_session()?;
            let id = args.get_one::<String>("id").unwrap();
            ctx.client.keep_room(&session.token, id).await?;
            println!("Saved {id}");
        }
        Some(("upload-photo", args)) => {
            let session = ctx.require_session()?;
            let room_id = args.get_one::<String>("room").unwrap();
            let file = args.get_one::<PathBuf>("file").unwrap();

            let room = find_room(&ctx, &session.token, room_id).await?;
            let mut screen = RoomScreen::open(&room);
            screen.select_frame(FrameSlot::One);
            screen.attach_photo(&ctx, &session, file).await;
            match screen.frame1 {
                Some(photo) => println!("Uploaded: {}", photo.url),
                None => return Err(anyhow!(screen.error_message.unwrap_or_default())),
            }
        }
        Some(("capsule", args)) => {
            let session = ctx.require_session()?;
            let room_id = args.get_one::<String>("room").unwrap();
            let offset = LockOffset {
                hours: *args.get_one::<u32>("hours").unwrap(),
                minutes: *args.get_one::<u32>("minutes").unwrap(),
                seconds: *args.get_one::<u32>("seconds").unwrap(),
            };

            let room = find_room(&ctx, &session.token, room_id).await?;
            let mut screen = RoomScreen::open(&room);
            screen.start_time_capsule(&ctx, &session, offset).await;

            let Some(unlock_at) = screen.unlock_at else {
                println!("Nothing to lock: capsule duration is zero");
                return Ok(());
            };
            if let Some(msg) = &screen.error_message {
                warn!("Unlock date not persisted: {msg}");
            }
            println!("\"{}\" locked until {unlock_at}", screen.room_name);

            if args.get_flag("watch") {
                let Some(mut updates) = screen.countdown_updates() else {
                    return Ok(());
                };
                println!("{}", screen.countdown_text);
                while updates.changed().await.is_ok() {
                    let state = updates.borrow().clone();
                    println!("{}", state.display);
                    if state.unlocked {
                        break;
                    }
                }
                // Let the unlock alarm deliver its notification before exit.
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }
        Some(("calendar", args)) => {
            let session = ctx.require_session()?;
            if args.get_flag("auth") {
                let url = ctx.client.calendar_auth_url(&session.token).await?;
                println!("{url}");
            } else {
                for event in ctx.client.calendar_events(&session.token).await? {
                    println!(
                        "{} .. {}  {}  {}",
                        event.start_time,
                        event.end_time,
                        event.title,
                        event.location.as_deref().unwrap_or("")
                    );
                }
            }
        }
        Some(("profile", args)) => {
            let session = ctx.require_session()?;
            let mut screen = ProfileScreen::open(&ctx, &session);

            if let Some(theme) = args.get_one::<String>("set-theme") {
                screen.set_theme(&ctx, theme);
            }
            if let Some(accent) = args.get_one::<String>("set-accent") {
                let argb = parse_argb(accent)?;
                screen.set_accent_color(&ctx, argb);
            }
            if let Some(email) = args.get_one::<String>("set-email") {
                screen.change_email(&ctx, &session, email).await;
            }
            if let Some(password) = args.get_one::<String>("set-password") {
                screen.change_password(&ctx, &session, password).await;
            }
            if let Some(msg) = screen.error_message {
                return Err(anyhow!(msg));
            }

            println!("{} <{}>", screen.user_name, screen.user_email);
            println!("theme: {}   accent: #{:08X}", screen.theme, screen.accent_color);
        }
        _ => unreachable!("subcommand required"),
    }

    Ok(())
}

async fn find_room(
    ctx: &AppContext,
    token: &str,
    room_id: &str,
) -> Result<bestbefore_types::models::Room> {
    ctx.client
        .rooms(token)
        .await
        .context("cannot list rooms")?
        .into_iter()
        .find(|r| r.id == room_id)
        .ok_or_else(|| anyhow!("No room with id {room_id}"))
}

fn parse_argb(input: &str) -> Result<u32> {
    let hex = input
        .trim_start_matches('#')
        .trim_start_matches("0x")
        .trim_start_matches("0X");
    u32::from_str_radix(hex, 16).with_context(|| format!("invalid ARGB color {input:?}"))
}
