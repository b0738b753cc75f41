pub mod analysis_llm;
pub mod history_file;
pub mod records;

pub use analysis_llm::OpenAiAnalysisAdapter;
pub use history_file::JsonFileHistoryStorage;
