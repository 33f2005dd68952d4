use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use trend_core::VideoTypeFilter;

/// Largest page the YouTube search endpoint will return
pub const MAX_SEARCH_RESULTS: u32 = 50;

/// Configuration for the YouTube Trend Analyzer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// YouTube Data API settings
    pub youtube: YouTubeConfig,

    /// Analysis pipeline settings
    pub analysis: AnalysisConfig,

    /// Output and export settings
    pub output: OutputConfig,

    /// Languages and categories offered to the user
    pub taxonomy: Taxonomy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YouTubeConfig {
    /// API key (usually supplied through YOUTUBE_API_KEY)
    pub api_key: Option<String>,

    /// Base URL of the Data API v3
    pub base_url: String,

    /// Search results per analysis run (1-50)
    pub max_results: u32,

    /// Per-request timeout in seconds
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Concurrent per-video lookups
    pub max_concurrent_lookups: usize,

    /// Extra sentiment lexicon merged over the built-in one
    pub lexicon_file: Option<PathBuf>,

    /// Video type used when the CLI does not specify one
    pub default_video_type: VideoTypeFilter,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory for exported result files
    pub export_dir: PathBuf,

    /// Formats written after each run
    pub export_formats: Vec<ExportFormat>,

    /// Default tracing filter level
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExportFormat {
    CSV,
    JSON,
}

/// A main category and its subcategories
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryGroup {
    pub name: String,
    pub subcategories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxonomy {
    pub languages: Vec<String>,

    /// Ordered the way they are presented
    pub categories: Vec<CategoryGroup>,
}

impl Taxonomy {
    pub fn category(&self, name: &str) -> Option<&CategoryGroup> {
        self.categories.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn subcategories(&self, category: &str) -> Option<&[String]> {
        self.category(category).map(|c| c.subcategories.as_slice())
    }

    pub fn has_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l.eq_ignore_ascii_case(language))
    }

    /// First category listing `sub_category`
    pub fn category_of(&self, sub_category: &str) -> Option<&CategoryGroup> {
        self.categories
            .iter()
            .find(|c| c.subcategories.iter().any(|s| s.eq_ignore_ascii_case(sub_category)))
    }

    pub fn category_names(&self) -> Vec<&str> {
        self.categories.iter().map(|c| c.name.as_str()).collect()
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        let groups: [(&str, &[&str]); 9] = [
            ("Entertainment", &["Comedy", "Funny Skits", "Pranks", "Challenges", "Vlogs", "Reaction", "Parodies"]),
            ("Educational", &["Motivational", "How-To", "Study Tips", "Science", "Language Learning", "Book Summaries"]),
            ("Tech", &["Product Reviews", "Unboxing", "Tech News", "AI Tools", "App Tutorials", "Comparison"]),
            ("Analysis", &["Movie Analysis", "Sports Analysis", "News Commentary", "Finance Case Studies"]),
            ("Emotional", &["Inspirational Stories", "Social Awareness", "Life Journey", "Mental Health"]),
            ("Gaming", &["Gameplay", "Funny Gaming", "Live Streaming", "Game Reviews"]),
            ("Business", &["Finance Education", "Online Earning", "Startup Stories", "Automation Tools"]),
            ("Music", &["Covers", "Dance", "Singing", "Art", "Calligraphy"]),
            ("Travel & Food", &["Travel Vlogs", "Street Food", "Hotel Reviews", "Budget Travel"]),
        ];

        Self {
            languages: vec!["English".to_string(), "Hindi".to_string(), "Gujarati".to_string()],
            categories: groups
                .iter()
                .map(|(name, subs)| CategoryGroup {
                    name: name.to_string(),
                    subcategories: subs.iter().map(|s| s.to_string()).collect(),
                })
                .collect(),
        }
    }
}

impl Config {
    /// Load configuration from the first config file found, falling back to
    /// defaults, then apply environment overrides
    pub fn load() -> Result<Self> {
        let config_paths = [
            "yt-trend-analyzer.toml",
            "config/yt-trend-analyzer.toml",
        ];

        for path in &config_paths {
            if Path::new(path).exists() {
                match Self::load_from(path) {
                    Ok(config) => return Ok(config),
                    Err(e) => tracing::warn!("Failed to parse config file {}: {:#}", path, e),
                }
            }
        }

        Self::from_env()
    }

    /// Load a specific config file, then apply environment overrides
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let mut config: Config = toml::from_str(&config_str)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.apply_env_overrides();
        tracing::info!("📄 Loaded configuration from: {}", path.display());
        Ok(config)
    }

    /// Defaults with environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Apply overrides from a variable lookup (the process environment in practice)
    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(api_key) = var("YOUTUBE_API_KEY") {
            if !api_key.trim().is_empty() {
                self.youtube.api_key = Some(api_key.trim().to_string());
            }
        }

        if let Some(max_results) = var("YT_TREND_MAX_RESULTS") {
            self.youtube.max_results = max_results.parse().unwrap_or(self.youtube.max_results);
        }

        if let Some(workers) = var("YT_TREND_WORKERS") {
            self.analysis.max_concurrent_lookups =
                workers.parse().unwrap_or(self.analysis.max_concurrent_lookups);
        }

        if let Some(export_dir) = var("YT_TREND_EXPORT_DIR") {
            self.output.export_dir = PathBuf::from(export_dir);
        }

        if let Some(log_level) = var("YT_TREND_LOG_LEVEL") {
            self.output.log_level = log_level;
        }
    }

    /// Save configuration to file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let config_str = toml::to_string_pretty(self)?;
        std::fs::write(path, config_str)?;
        tracing::info!("💾 Configuration saved to: {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.youtube.max_results == 0 || self.youtube.max_results > MAX_SEARCH_RESULTS {
            return Err(anyhow!(
                "max_results must be between 1 and {}, got {}",
                MAX_SEARCH_RESULTS,
                self.youtube.max_results
            ));
        }

        if self.youtube.timeout_seconds == 0 {
            return Err(anyhow!("timeout_seconds must be greater than 0"));
        }

        if self.analysis.max_concurrent_lookups == 0 {
            return Err(anyhow!("max_concurrent_lookups must be greater than 0"));
        }

        if self.taxonomy.languages.is_empty() {
            return Err(anyhow!("taxonomy must list at least one language"));
        }

        if let Some(empty) = self.taxonomy.categories.iter().find(|c| c.subcategories.is_empty()) {
            return Err(anyhow!("category '{}' has no subcategories", empty.name));
        }

        if let Some(ref lexicon) = self.analysis.lexicon_file {
            if !lexicon.exists() {
                return Err(anyhow!("Lexicon file not found: {}", lexicon.display()));
            }
        }

        tracing::debug!("✅ Configuration validation passed");
        Ok(())
    }

    /// Get runtime configuration summary
    pub fn summary(&self) -> String {
        format!(
            "YouTube Trend Analyzer Configuration:\n\
            - API Key: {}\n\
            - Max Results: {}\n\
            - Concurrent Lookups: {}\n\
            - Export Directory: {}\n\
            - Export Formats: {:?}\n\
            - Languages: {}\n\
            - Categories: {}",
            if self.youtube.api_key.is_some() { "set" } else { "missing" },
            self.youtube.max_results,
            self.analysis.max_concurrent_lookups,
            self.output.export_dir.display(),
            self.output.export_formats,
            self.taxonomy.languages.join(", "),
            self.taxonomy.categories.len()
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            youtube: YouTubeConfig {
                api_key: None,
                base_url: "https://www.googleapis.com/youtube/v3".to_string(),
                max_results: 30,
                timeout_seconds: 30,
            },
            analysis: AnalysisConfig {
                max_concurrent_lookups: num_cpus::get().clamp(1, 8),
                lexicon_file: None,
                default_video_type: VideoTypeFilter::ShortVideos,
            },
            output: OutputConfig {
                export_dir: PathBuf::from("./output"),
                export_formats: vec![ExportFormat::CSV],
                log_level: "info".to_string(),
            },
            taxonomy: Taxonomy::default(),
        }
    }
}

/// Configuration builder for programmatic config creation
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.config.youtube.api_key = Some(api_key.into());
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.youtube.base_url = base_url.into();
        self
    }

    pub fn with_max_results(mut self, max_results: u32) -> Self {
        self.config.youtube.max_results = max_results;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.config.analysis.max_concurrent_lookups = workers;
        self
    }

    pub fn with_lexicon_file(mut self, path: PathBuf) -> Self {
        self.config.analysis.lexicon_file = Some(path);
        self
    }

    pub fn with_export_dir(mut self, dir: PathBuf) -> Self {
        self.config.output.export_dir = dir;
        self
    }

    pub fn with_export_formats(mut self, formats: Vec<ExportFormat>) -> Self {
        self.config.output.export_formats = formats;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
