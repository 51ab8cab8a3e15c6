use crate::store::INITIAL_CAPACITY;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind: String,
    pub port: u16,
    pub loglevel: String,
    /// Bucket count the store starts with.
    pub initial_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind: "127.0.0.1".to_string(),
            port: 6379,
            loglevel: "info".to_string(),
            initial_capacity: INITIAL_CAPACITY,
        }
    }
}

impl Config {
    /// Build a config from `--flag value` pairs. Unknown flags and
    /// unparsable values are ignored.
    pub fn from_args(args: &[String]) -> Self {
        let mut config = Config::default();
        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--port" => {
                    if i + 1 < args.len() {
                        if let Ok(p) = args[i + 1].parse() {
                            config.port = p;
                        }
                        i += 1;
                    }
                }
                "--bind" => {
                    if i + 1 < args.len() {
                        config.bind = args[i + 1].clone();
                        i += 1;
                    }
                }
                "--loglevel" => {
                    if i + 1 < args.len() {
                        config.loglevel = args[i + 1].clone();
                        i += 1;
                    }
                }
                "--initial-capacity" => {
                    if i + 1 < args.len() {
                        if let Ok(n) = args[i + 1].parse::<usize>() {
                            config.initial_capacity = n.max(1);
                        }
                        i += 1;
                    }
                }
                _ => {}
            }
            i += 1;
        }
        config
    }

    /// `host:port` to listen on.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}
