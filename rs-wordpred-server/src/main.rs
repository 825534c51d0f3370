use std::path::{Path, PathBuf};
use std::sync::RwLock;

use actix_cors::Cors;
use actix_web::{get, put, web, App, HttpResponse, HttpServer, Responder};
use clap::Parser;
use serde::{Deserialize, Serialize};

use rs_wordpred_core::io::{get_filename, list_files, normalize_folder};
use rs_wordpred_core::{CorpusError, NextWordPredictor, PredictionRequest, Tier};

/// Extension of corpus files served from the data directory
const CORPUS_EXTENSION: &str = "txt";

/// HTTP front-end for the next-word predictor.
#[derive(Parser, Debug, Clone)]
#[command(version, about)]
struct Config {
	/// Address to bind
	#[arg(long, default_value = "127.0.0.1", env = "WORDPRED_HOST")]
	host: String,

	/// Port to listen on
	#[arg(long, default_value_t = 5000, env = "WORDPRED_PORT")]
	port: u16,

	/// Directory holding the `.txt` corpora
	#[arg(long, default_value = "./data", env = "WORDPRED_DATA_DIR")]
	data_dir: String,

	/// Corpora (names without extension) to load at startup
	#[arg(long, value_delimiter = ',', env = "WORDPRED_CORPORA")]
	corpus: Vec<String>,
}

/// Query parameters for the `/v1/load_corpora` endpoint
#[derive(Deserialize)]
struct CorpusQuery {
	names: Option<String>
}

#[derive(Serialize)]
struct ScoredWord<'a> {
	word: &'a str,
	score: f64,
}

#[derive(Serialize)]
struct PredictResponse<'a> {
	tier: Tier,
	predictions: Vec<ScoredWord<'a>>,
}

struct SharedData {
	data_dir: PathBuf,
	model: NextWordPredictor,
	corpus_names: Vec<String>,
}

impl SharedData {
	fn new(data_dir: PathBuf) -> Self {
		Self { data_dir, model: NextWordPredictor::new(), corpus_names: Vec::new() }
	}

	/// Swaps in a freshly built model.
	fn replace(&mut self, (model, corpus_names): (NextWordPredictor, Vec<String>)) {
		self.model = model;
		self.corpus_names = corpus_names;
	}
}

/// Builds a fresh model from the named corpora, merging their counts.
///
/// Runs without touching the live model: callers swap the result in only
/// once every corpus has been loaded.
fn build_model(data_dir: &Path, names: &[String]) -> Result<(NextWordPredictor, Vec<String>), CorpusError> {
	let mut model = NextWordPredictor::new();
	let mut corpus_names = Vec::new();
	for name in names {
		let path = data_dir.join(format!("{name}.{CORPUS_EXTENSION}"));
		let mut partial_model = NextWordPredictor::new();
		partial_model.load_corpus_parallel(&path)?;
		model.merge(&partial_model);
		corpus_names.push(name.clone());
	}
	Ok((model, corpus_names))
}

/// HTTP GET endpoint `/v1/predict`
///
/// Predicts the next word from `prefix`, `last_word` and `second_last_word`
/// query parameters. All are optional. Returns the tier used and the
/// candidates sorted by descending score.
#[get("/v1/predict")]
async fn get_predictions(data: web::Data<RwLock<SharedData>>, query: web::Query<PredictionRequest>) -> impl Responder {
	let request = query.into_inner().normalized();

	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let predictions = shared_data.model.predict_request(&request);
	let response = PredictResponse {
		tier: predictions.tier(),
		predictions: predictions
			.ranked()
			.into_iter()
			.map(|(word, score)| ScoredWord { word, score })
			.collect(),
	};
	HttpResponse::Ok().json(response)
}

/// HTTP GET endpoint `/v1/corpora`: corpora available in the data directory.
#[get("/v1/corpora")]
async fn get_corpora(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let data_dir = match data.read() {
		Ok(m) => m.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	let names = list_files(&data_dir, CORPUS_EXTENSION)
		.and_then(|files| files.iter().map(get_filename).collect::<std::io::Result<Vec<_>>>());
	match names {
		Ok(names) => HttpResponse::Ok().body(names.join("\n")),
		Err(_) => HttpResponse::InternalServerError().body("Failed to list corpora")
	}
}

#[get("/v1/loaded_corpora")]
async fn get_loaded_corpora(data: web::Data<RwLock<SharedData>>) -> impl Responder {
	let shared_data = match data.read() {
		Ok(m) => m,
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};
	HttpResponse::Ok().body(shared_data.corpus_names.join("\n"))
}

/// HTTP PUT endpoint `/v1/load_corpora?names=a,b`
///
/// Replaces the live model with one built from the named corpora.
#[put("/v1/load_corpora")]
async fn put_corpora(data: web::Data<RwLock<SharedData>>, query: web::Query<CorpusQuery>) -> impl Responder {
	let query_names = match &query.names {
		Some(s) if !s.trim().is_empty() => s.trim(),
		_ => return HttpResponse::BadRequest().body("Missing or empty corpus name"),
	};

	let corpus_names: Vec<String> = query_names
		.split(',')
		.map(|s| s.trim())
		.filter(|s| !s.is_empty())
		.map(str::to_owned)
		.collect();

	if corpus_names.iter().any(|name| name.contains(['/', '\\']) || name.contains("..")) {
		return HttpResponse::BadRequest().body("Corpus names cannot contain paths");
	}

	let data_dir = match data.read() {
		Ok(m) => m.data_dir.clone(),
		Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
	};

	// Corpus files are read on the blocking pool, predictions keep being served
	let built = match web::block(move || build_model(&data_dir, &corpus_names)).await {
		Ok(built) => built,
		Err(_) => return HttpResponse::InternalServerError().body("Corpus loading was interrupted"),
	};

	match built {
		Ok(built) => {
			match data.write() {
				Ok(mut m) => m.replace(built),
				Err(_) => return HttpResponse::InternalServerError().body("Model lock failed"),
			}
			HttpResponse::Ok().body("Corpora loaded successfully")
		}
		Err(e @ CorpusError::Unavailable { .. }) => HttpResponse::NotFound().body(e.to_string()),
		Err(e) => HttpResponse::InternalServerError().body(format!("Failed to load corpus: {e}")),
	}
}

/// Main entry point for the server.
///
/// Loads the startup corpora (a failure is logged and the server starts
/// with an empty model), wraps the model in an `RwLock` and starts an
/// Actix-web HTTP server.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
	env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
	let config = Config::parse();

	let mut shared_data = SharedData::new(normalize_folder(&config.data_dir));
	if !config.corpus.is_empty() {
		match build_model(&shared_data.data_dir, &config.corpus) {
			Ok(built) => shared_data.replace(built),
			Err(e) => log::error!("{e}"),
		}
	}
	let shared_model = web::Data::new(RwLock::new(shared_data));

	log::info!("Listening on {}:{}", config.host, config.port);
	HttpServer::new(move || {
		App::new()
			.wrap(Cors::permissive())
			.app_data(shared_model.clone())
			.service(get_predictions)
			.service(get_corpora)
			.service(put_corpora)
			.service(get_loaded_corpora)
	})
		.bind((config.host.as_str(), config.port))?
		.run()
		.await
}
