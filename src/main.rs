use std::str::FromStr;

use clap::{Parser, Subcommand};

use user_registry::backend::BackendFactory;
use user_registry::config::AppConfig;
use user_registry::error::AppError;
use user_registry::password::{PasswordAlgorithm, PasswordManager};
use user_registry::{UserDraft, UserRegistry};

#[derive(Parser, Debug)]
#[command(name = "user-registry")]
#[command(about = "Admin CLI for the user registry")]
struct Args {
    /// Configuration file path (default: config.yaml)
    #[arg(short, long, default_value = "config.yaml")]
    config: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a user
    Create {
        name: String,
        email: String,
        password: String,
    },
    /// Show a user by email
    Show { email: String },
    /// List all users
    List,
    /// Check a password against the stored hash for an email
    Verify { email: String, password: String },
    /// Delete a user by id
    Delete { id: String },
}

async fn setup_registry(app_config: &AppConfig) -> Result<UserRegistry, Box<dyn std::error::Error>> {
    let settings = app_config.backend_settings()?;
    let backend = BackendFactory::create(&settings).await?;
    backend.init_schema().await?;
    backend.health_check().await?;

    let algorithm = PasswordAlgorithm::from_str(&app_config.password.algorithm)?;
    Ok(UserRegistry::new(backend, PasswordManager::new(algorithm)))
}

fn print_validation_errors(err: &AppError) {
    if let Some(errors) = err.validation_errors() {
        eprintln!("Could not save the user:");
        for violation in errors.iter() {
            eprintln!("  {} {}", violation.field, violation.message);
        }
    } else {
        eprintln!("{}", err);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::fmt::init();

    // Load configuration from specified file or use defaults
    let app_config = if args.config == "config.yaml" && !std::path::Path::new("config.yaml").exists()
    {
        println!("No config.yaml found, using default configuration:");
        println!("   - In-memory backend (nothing is persisted between runs)");
        println!("   - Argon2id password hashes\n");
        AppConfig::default_config()
    } else {
        AppConfig::load_from_file(&args.config)
            .map_err(|e| format!("Failed to load configuration: {}", e))?
    };

    let registry = setup_registry(&app_config).await?;

    match args.command {
        Command::Create {
            name,
            email,
            password,
        } => {
            let draft = UserDraft::new(name, email).with_password(password);
            match registry.create_user(draft).await {
                Ok(user) => println!("Created user {} <{}>", user.id, user.email),
                Err(err) => {
                    print_validation_errors(&err);
                    std::process::exit(1);
                }
            }
        }
        Command::Show { email } => match registry.find_user_by_email(&email).await? {
            Some(user) => println!("{}", serde_json::to_string_pretty(&user)?),
            None => {
                eprintln!("No user with email {}", email);
                std::process::exit(1);
            }
        },
        Command::List => {
            for user in registry.list_users().await? {
                println!("{}  {}  {}", user.id, user.email, user.name);
            }
        }
        Command::Verify { email, password } => {
            if registry.authenticate(&email, &password).await? {
                println!("Password matches");
            } else {
                println!("Password does not match");
                std::process::exit(1);
            }
        }
        Command::Delete { id } => {
            if registry.delete_user(&id).await? {
                println!("Deleted user {}", id);
            } else {
                eprintln!("No user with id {}", id);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
