use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use base64::Engine;
use clap::{Parser, Subcommand};

use linkshelf_client::keystore::{load_identity, load_or_create_identity, save_identity};
use linkshelf_client::{ClientConfig, HttpService, LinkService, LinkStore};
use linkshelf_shared::identity::Identity;
use linkshelf_shared::{url_error, Link, Principal, UserProfile, UserRole};

/// Command-line client for a Linkshelf server.
#[derive(Debug, Parser)]
#[command(name = "linkshelf")]
#[command(about = "Save, list, edit and delete your links", long_about = None)]
pub struct Cli {
    /// Server base URL (overrides LINKSHELF_SERVER_URL).
    #[arg(long, global = true)]
    server: Option<String>,

    /// Identity key file (overrides LINKSHELF_KEY_PATH).
    #[arg(long, global = true)]
    key: Option<PathBuf>,

    /// Call the server without credentials.
    #[arg(long, global = true)]
    anonymous: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create the identity key file.
    Keygen {
        /// Replace an existing key.
        #[arg(long)]
        force: bool,
    },

    /// Show your principal, role and profile.
    Whoami,

    /// Check a URL locally without saving it.
    CheckUrl { url: String },

    /// List saved links.
    List,

    /// Show one link.
    Show { id: String },

    /// Save a new link.
    Add {
        url: String,
        title: String,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        /// Image file embedded as a data URI.
        #[arg(long)]
        image: Option<PathBuf>,
        /// Store under this id instead of a generated one.
        #[arg(long)]
        id: Option<String>,
    },

    /// Edit a saved link; omitted fields keep their value.
    Edit {
        id: String,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        color: Option<String>,
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// Delete a saved link.
    Delete { id: String },

    /// Show or set your profile name.
    Profile {
        /// New display name.
        #[arg(long)]
        name: Option<String>,
    },

    /// Show a user's profile (yours, or anyone's if you are admin).
    UserProfile { principal: Principal },

    /// Assign a role to a user (admin only).
    AssignRole { principal: Principal, role: UserRole },
}

impl Cli {
    pub async fn run_from_args() -> Result<()> {
        Cli::parse().run().await
    }

    async fn run(self) -> Result<()> {
        let mut config = ClientConfig::from_env();
        if let Some(server) = self.server {
            config.server_url = server;
        }
        if let Some(key) = self.key {
            config.key_path = Some(key);
        }
        tracing::debug!(?config, "loaded config");

        let key_path = config
            .key_path
            .clone()
            .ok_or_else(|| anyhow!("no data directory; pass --key"))?;
        let anonymous = self.anonymous;
        let connect = || -> Result<LinkStore<HttpService>> {
            let identity = if anonymous {
                None
            } else {
                Some(load_or_create_identity(&key_path)?)
            };
            Ok(LinkStore::new(HttpService::new(&config.server_url, identity)?))
        };

        match self.command {
            Command::Keygen { force } => keygen(&key_path, force)?,
            Command::CheckUrl { url } => match url_error(&url) {
                None => println!("ok"),
                Some(reason) => bail!(reason),
            },
            Command::Whoami => {
                let store = connect()?;
                let service = store.service();
                let principal = service.identity().map(Identity::principal);
                match principal {
                    Some(p) => println!("principal: {p}"),
                    None => println!("principal: anonymous"),
                }
                println!("role:      {}", service.get_caller_user_role().await?);
                if principal.is_some() {
                    match service.get_caller_user_profile().await? {
                        Some(profile) => println!("name:      {}", profile.name),
                        None => println!("name:      (not set, use `linkshelf profile --name`)"),
                    }
                }
            }
            Command::List => {
                let links = connect()?.list().await?;
                if links.is_empty() {
                    println!("No links saved yet.");
                }
                for record in links {
                    println!(
                        "[{}] {}  {}\n    {}",
                        record.link.initials(),
                        record.link.title,
                        record.link.url,
                        record.id
                    );
                    if let Some(description) = &record.link.description {
                        println!("    {description}");
                    }
                }
            }
            Command::Show { id } => {
                let link = connect()?.get(&id).await?;
                print_link(&id, &link);
            }
            Command::Add {
                url,
                title,
                description,
                color,
                image,
                id,
            } => {
                let link = Link {
                    url,
                    title,
                    description,
                    image: image.as_deref().map(image_data_uri).transpose()?,
                    color,
                };
                let store = connect()?;
                let id = match id {
                    Some(id) => {
                        store.add(&id, &link).await?;
                        id
                    }
                    None => store.create(&link).await?,
                };
                println!("saved {id}");
            }
            Command::Edit {
                id,
                url,
                title,
                description,
                color,
                image,
            } => {
                let store = connect()?;
                let mut link = store.get(&id).await?;
                if let Some(url) = url {
                    link.url = url;
                }
                if let Some(title) = title {
                    link.title = title;
                }
                if let Some(description) = description {
                    link.description = Some(description);
                }
                if let Some(color) = color {
                    link.color = Some(color);
                }
                if let Some(image) = image {
                    link.image = Some(image_data_uri(&image)?);
                }
                store.update(&id, &link).await?;
                println!("updated {id}");
            }
            Command::Delete { id } => {
                connect()?.delete(&id).await?;
                println!("deleted {id}");
            }
            Command::Profile { name } => {
                let store = connect()?;
                let service = store.service();
                if let Some(name) = name {
                    service
                        .save_caller_user_profile(&UserProfile { name })
                        .await?;
                }
                match service.get_caller_user_profile().await? {
                    Some(profile) => println!("{}", profile.name),
                    None => println!("(no profile)"),
                }
            }
            Command::UserProfile { principal } => {
                match connect()?.service().get_user_profile(&principal).await? {
                    Some(profile) => println!("{}", profile.name),
                    None => println!("(no profile)"),
                }
            }
            Command::AssignRole { principal, role } => {
                connect()?
                    .service()
                    .assign_caller_user_role(&principal, role)
                    .await?;
                println!("{} is now {role}", principal.short());
            }
        }

        Ok(())
    }
}

fn keygen(path: &Path, force: bool) -> Result<()> {
    if !force {
        if let Some(existing) = load_identity(path)? {
            bail!(
                "{} already holds key {}; use --force to replace it",
                path.display(),
                existing.principal()
            );
        }
    }
    let identity = Identity::generate();
    save_identity(path, &identity)?;
    println!("{}", identity.principal());
    Ok(())
}

fn print_link(id: &str, link: &Link) {
    println!("id:          {id}");
    println!("title:       {}", link.title);
    println!("url:         {}", link.url);
    if let Some(description) = &link.description {
        println!("description: {description}");
    }
    if let Some(color) = &link.color {
        println!("color:       {color}");
    }
    if link.image.is_some() {
        println!("image:       (embedded)");
    }
}

/// Read an image file into a `data:image/...;base64,` URI.
fn image_data_uri(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let mime = match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        other => bail!("unsupported image type: {other:?}"),
    };

    let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    Ok(format!("data:{mime};base64,{payload}"))
}
