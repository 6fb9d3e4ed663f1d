#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Route {
    Portal,
    Home,
    PuzzlePicker { cat: Option<String> },
    PuzzlePlay { id: String, cat: Option<String> },
    MyLibrary,
    MyPlay { id: String },
    Chirarizumu,
    ChirarizumuPlay { id: String },
    Quiz { cat: Option<String> },
    NotFound,
}

impl Route {
    /// Parses `path?query` as kept in the location hash (leading `#` allowed).
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().trim_start_matches('#');
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let path = path.trim_end_matches('/');
        let param = |name: &str| {
            form_urlencoded::parse(query.as_bytes())
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        match path {
            "" | "/portal" => Route::Portal,
            "/ahatouch" => Route::Home,
            "/ahatouch/puzzle" => Route::PuzzlePicker { cat: param("cat") },
            "/ahatouch/puzzle/play" => Route::PuzzlePlay {
                id: param("id").unwrap_or_default(),
                cat: param("cat"),
            },
            "/ahatouch/my" => Route::MyLibrary,
            "/ahatouch/my/play" => Route::MyPlay {
                id: param("id").unwrap_or_default(),
            },
            "/ahatouch/chirarizumu" => Route::Chirarizumu,
            "/ahatouch/chirarizumu/play" => Route::ChirarizumuPlay {
                id: param("id").unwrap_or_default(),
            },
            "/ahatouch/quiz" => Route::Quiz { cat: param("cat") },
            _ => Route::NotFound,
        }
    }

    pub fn path(&self) -> String {
        let (path, params): (&str, Vec<(&str, &str)>) = match self {
            Route::Portal | Route::NotFound => ("/", Vec::new()),
            Route::Home => ("/ahatouch", Vec::new()),
            Route::PuzzlePicker { cat } => ("/ahatouch/puzzle", opt_param("cat", cat)),
            Route::PuzzlePlay { id, cat } => {
                let mut params = vec![("id", id.as_str())];
                params.extend(opt_param("cat", cat));
                ("/ahatouch/puzzle/play", params)
            }
            Route::MyLibrary => ("/ahatouch/my", Vec::new()),
            Route::MyPlay { id } => ("/ahatouch/my/play", vec![("id", id.as_str())]),
            Route::Chirarizumu => ("/ahatouch/chirarizumu", Vec::new()),
            Route::ChirarizumuPlay { id } => {
                ("/ahatouch/chirarizumu/play", vec![("id", id.as_str())])
            }
            Route::Quiz { cat } => ("/ahatouch/quiz", opt_param("cat", cat)),
        };
        if params.is_empty() {
            return path.to_string();
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params)
            .finish();
        format!("{path}?{query}")
    }

    pub fn href(&self) -> String {
        format!("#{}", self.path())
    }
}

fn opt_param<'a>(key: &'a str, value: &'a Option<String>) -> Vec<(&'a str, &'a str)> {
    value
        .as_deref()
        .map(|value| vec![(key, value)])
        .unwrap_or_default()
}
