//! [`Args`] definitions.

use clap::Parser;

/// Server of the travel listings platform.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

impl Args {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

/// Populates the travel listings database with sample data.
#[derive(Debug, Parser)]
#[command(name = "seed", version, about, long_about = None)]
pub struct SeedArgs {
    /// Path to the configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,

    /// Number of listings to create.
    #[arg(long, default_value_t = 20)]
    pub listings: usize,

    /// Number of bookings to create.
    #[arg(long, default_value_t = 50)]
    pub bookings: usize,

    /// Maximum number of reviews to create.
    #[arg(long, default_value_t = 30)]
    pub reviews: usize,

    /// Remove all the existing users, listings, bookings and reviews first.
    #[arg(long)]
    pub clear: bool,

    /// Seed of the random generator, making the generated data repeatable.
    #[arg(long)]
    pub rng_seed: Option<u64>,
}

impl SeedArgs {
    /// Parses command line arguments.
    ///
    /// # Errors
    ///
    /// Errors if failed to parse command line arguments.
    pub fn parse() -> Result<Self, clap::Error> {
        <Self as Parser>::try_parse()
    }
}

impl From<&SeedArgs> for service::seed::Counts {
    fn from(args: &SeedArgs) -> Self {
        Self {
            listings: args.listings,
            bookings: args.bookings,
            reviews: args.reviews,
        }
    }
}

#[cfg(test)]
mod spec {
    use clap::Parser as _;
    use service::seed::Counts;

    use super::SeedArgs;

    #[test]
    fn seed_defaults() {
        let args = SeedArgs::try_parse_from(["seed"]).unwrap();

        assert_eq!(args.config, "config.toml");
        assert_eq!(Counts::from(&args), Counts::default());
        assert!(!args.clear);
        assert_eq!(args.rng_seed, None);
    }

    #[test]
    fn seed_overrides() {
        let args = SeedArgs::try_parse_from([
            "seed",
            "--listings",
            "5",
            "--bookings=7",
            "--reviews",
            "0",
            "--clear",
            "--rng-seed",
            "42",
        ])
        .unwrap();

        assert_eq!(
            Counts::from(&args),
            Counts {
                listings: 5,
                bookings: 7,
                reviews: 0,
            },
        );
        assert!(args.clear);
        assert_eq!(args.rng_seed, Some(42));
    }

    #[test]
    fn rejects_negative_counts() {
        let args = SeedArgs::try_parse_from(["seed", "--listings", "-1"]);

        assert!(args.is_err());
    }
}
