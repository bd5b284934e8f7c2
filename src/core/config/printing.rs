use crate::core::config::data::{path_display, Config, Settings};

impl Config {
    pub fn print_all(&self) {
        println!("Current configuration:");
        match &self.endpoint {
            Some(endpoint) => println!("  endpoint: {endpoint}"),
            None => println!("  endpoint: (unset)"),
        }
        match &self.title {
            Some(title) => println!("  title: {title}"),
            None => println!("  title: (unset)"),
        }
        match self.history_limit {
            Some(limit) => println!("  history-limit: {limit}"),
            None => println!("  history-limit: (unlimited)"),
        }
        match &self.log_file {
            Some(path) => println!("  log-file: {}", path_display(path)),
            None => println!("  log-file: (unset)"),
        }
        match self.notification_seconds {
            Some(seconds) => println!("  notification-seconds: {seconds}"),
            None => println!("  notification-seconds: (unset)"),
        }
    }
}

impl Settings {
    pub fn print_all(&self) {
        println!("Effective settings:");
        println!("  endpoint: {}", self.endpoint);
        println!("  title: {}", self.title);
        match self.history_limit {
            Some(limit) => println!("  history-limit: {limit}"),
            None => println!("  history-limit: (unlimited)"),
        }
        match &self.log_file {
            Some(path) => println!("  log-file: {}", path_display(path)),
            None => println!("  log-file: (none)"),
        }
        println!("  notification-seconds: {}", self.notification_seconds);
    }
}
