use super::*;
use endtoend_core::FakeClock;
use parking_lot::Mutex;
use std::sync::Arc;

struct ScriptedFetcher {
    responses: Arc<Mutex<Vec<Result<String, ConfigFetchError>>>>,
    calls: Arc<Mutex<u32>>,
}

impl ScriptedFetcher {
    fn new(responses: Vec<Result<String, ConfigFetchError>>) -> Self {
        Self { responses: Arc::new(Mutex::new(responses)), calls: Arc::new(Mutex::new(0)) }
    }

    fn calls_handle(&self) -> Arc<Mutex<u32>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl ConfigFetcher for ScriptedFetcher {
    async fn fetch(&self, _url: &str) -> Result<String, ConfigFetchError> {
        *self.calls.lock() += 1;
        let mut responses = self.responses.lock();
        if responses.is_empty() {
            return Err(ConfigFetchError::Fetch("no more scripted responses".to_string()));
        }
        responses.remove(0)
    }
}

fn config_with_location(url: &str, workdir: &str) -> Config {
    Config { configlocation: Some(url.to_string()), workdir: workdir.into(), ..Config::default() }
}

#[tokio::test]
async fn does_not_refresh_before_the_24h_interval_elapses() {
    let fetcher = ScriptedFetcher::new(vec![Ok(format!("workdir = \"{}\"", "/new"))]);
    let config = config_with_location("https://example.invalid/config.toml", "/old");
    let mut refresher = ConfigRefresher::new(fetcher, config, 1_000);
    let clock = FakeClock::new(1_000 + 3_600);

    refresher.refresh_if_stale(&clock, false).await;

    assert_eq!(refresher.current().workdir.to_str().unwrap(), "/old");
}

#[tokio::test]
async fn refreshes_after_24h_when_no_site_is_unknown() {
    let fetcher = ScriptedFetcher::new(vec![Ok("workdir = \"/new\"".to_string())]);
    let config = config_with_location("https://example.invalid/config.toml", "/old");
    let mut refresher = ConfigRefresher::new(fetcher, config, 1_000);
    let clock = FakeClock::new(1_000 + 86_400);

    refresher.refresh_if_stale(&clock, false).await;

    assert_eq!(refresher.current().workdir.to_str().unwrap(), "/new");
}

#[tokio::test]
async fn refreshes_after_only_1h_when_a_site_is_unknown() {
    let fetcher = ScriptedFetcher::new(vec![Ok("workdir = \"/new\"".to_string())]);
    let config = config_with_location("https://example.invalid/config.toml", "/old");
    let mut refresher = ConfigRefresher::new(fetcher, config, 1_000);
    let clock = FakeClock::new(1_000 + 3_601);

    refresher.refresh_if_stale(&clock, true).await;

    assert_eq!(refresher.current().workdir.to_str().unwrap(), "/new");
}

#[tokio::test]
async fn falls_back_to_last_known_good_config_on_fetch_failure() {
    let fetcher = ScriptedFetcher::new(vec![Err(ConfigFetchError::Fetch("timeout".to_string()))]);
    let config = config_with_location("https://example.invalid/config.toml", "/old");
    let mut refresher = ConfigRefresher::new(fetcher, config, 1_000);
    let clock = FakeClock::new(1_000 + 86_400);

    refresher.refresh_if_stale(&clock, false).await;

    assert_eq!(refresher.current().workdir.to_str().unwrap(), "/old");
}

#[tokio::test]
async fn falls_back_to_last_known_good_config_on_malformed_response() {
    let fetcher = ScriptedFetcher::new(vec![Ok("not valid toml = [".to_string())]);
    let config = config_with_location("https://example.invalid/config.toml", "/old");
    let mut refresher = ConfigRefresher::new(fetcher, config, 1_000);
    let clock = FakeClock::new(1_000 + 86_400);

    refresher.refresh_if_stale(&clock, false).await;

    assert_eq!(refresher.current().workdir.to_str().unwrap(), "/old");
}

#[tokio::test]
async fn a_failed_fetch_is_retried_on_the_next_call_rather_than_waiting_a_full_interval() {
    let fetcher = ScriptedFetcher::new(vec![
        Err(ConfigFetchError::Fetch("timeout".to_string())),
        Ok("workdir = \"/new\"".to_string()),
    ]);
    let config = config_with_location("https://example.invalid/config.toml", "/old");
    let mut refresher = ConfigRefresher::new(fetcher, config, 1_000);
    let clock = FakeClock::new(1_000 + 86_400);

    refresher.refresh_if_stale(&clock, false).await;
    assert_eq!(refresher.current().workdir.to_str().unwrap(), "/old");

    refresher.refresh_if_stale(&clock, false).await;
    assert_eq!(refresher.current().workdir.to_str().unwrap(), "/new");
}

#[tokio::test]
async fn no_configlocation_means_no_fetch_attempt() {
    let fetcher = ScriptedFetcher::new(vec![Ok("workdir = \"/new\"".to_string())]);
    let calls = fetcher.calls_handle();
    let config = Config { configlocation: None, workdir: "/old".into(), ..Config::default() };
    let mut refresher = ConfigRefresher::new(fetcher, config, 1_000);
    let clock = FakeClock::new(1_000 + 86_400);
    refresher.refresh_if_stale(&clock, false).await;

    assert_eq!(*calls.lock(), 0);
}
