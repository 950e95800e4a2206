use clap::{Parser, Subcommand};
use objectfs::fuse::FuseFs;
use objectfs::fuse::mount::mount_unprivileged;
use objectfs::store::client::{ObjectBackend, ObjectClient};
use objectfs::store::localfs::LocalFsBackend;
use objectfs::store::s3::{S3Backend, S3Config};
use objectfs::vfs::fs::ObjectFs;

#[derive(Parser)]
#[command(name = "objectfs", version, about = "Mount an object store as a filesystem")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Mount an S3-compatible bucket (credentials from the environment:
    /// AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY).
    Mount {
        /// Bucket to mount
        bucket: String,
        /// Empty directory to mount at
        mount_point: String,
        /// AWS region
        #[arg(long, default_value = "us-east-1")]
        region: String,
        /// Custom endpoint URL (MinIO and friends)
        #[arg(long)]
        endpoint: Option<String>,
        /// Volume label reported to the kernel
        #[arg(long, default_value = "objectfs")]
        volname: String,
    },
    /// Mount a local directory through the same adapter (development).
    MountLocal {
        /// Backend data directory (created if missing)
        data_dir: String,
        /// Empty directory to mount at
        mount_point: String,
        /// Volume label reported to the kernel
        #[arg(long, default_value = "objectfs")]
        volname: String,
    },
}

async fn run_mount<B: ObjectBackend + 'static>(
    backend: B,
    mount_point: &str,
    volname: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let fs = FuseFs::new(ObjectFs::new(ObjectClient::new(backend)));

    std::fs::create_dir_all(mount_point)?;
    log::info!("mounting {volname} at {mount_point}");
    let handle = mount_unprivileged(fs, std::path::Path::new(mount_point), volname).await?;

    println!("Mounted at {mount_point}. Press Ctrl+C to unmount and exit.");
    tokio::signal::ctrl_c().await?;

    println!("Unmounting...");
    handle.unmount().await?;
    Ok(())
}

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Mount {
            bucket,
            mount_point,
            region,
            endpoint,
            volname,
        } => {
            let config = S3Config {
                region,
                endpoint_url: endpoint,
                ..S3Config::default()
            };
            match S3Backend::new(bucket, config).await {
                Ok(backend) => run_mount(backend, &mount_point, &volname).await,
                Err(e) => Err(e),
            }
        }
        Command::MountLocal {
            data_dir,
            mount_point,
            volname,
        } => {
            if let Err(e) = std::fs::create_dir_all(&data_dir) {
                eprintln!("create data dir failed: {e}");
                std::process::exit(1);
            }
            run_mount(LocalFsBackend::new(&data_dir), &mount_point, &volname).await
        }
    };

    if let Err(e) = result {
        eprintln!("objectfs: {e}");
        std::process::exit(1);
    }
}
