/// Field and column names shared by the pipeline, the readers and the writers.

// Recognized scholarship fields, in the order they are combined into raw text
pub const SCHOLARSHIP_NAME: &str = "Scholarship Name";
pub const PROVIDER: &str = "Provider";
pub const COUNTRY: &str = "Country";
pub const ELIGIBILITY: &str = "Eligibility";
pub const BENEFITS: &str = "Benefits";
pub const PROGRAM: &str = "Program";
pub const DEADLINE: &str = "Deadline";
pub const APPLICATION_LINK: &str = "Application Link";

pub const RECOGNIZED_FIELDS: [&str; 8] = [
    SCHOLARSHIP_NAME,
    PROVIDER,
    COUNTRY,
    ELIGIBILITY,
    BENEFITS,
    PROGRAM,
    DEADLINE,
    APPLICATION_LINK,
];

// Synthetic columns appended by the cleaning pipeline
pub const TEXT_RAW_COLUMN: &str = "scholarship_text_raw";
pub const TEXT_CLEANED_COLUMN: &str = "scholarship_text_cleaned";
pub const ID_COLUMN: &str = "scholarship_id";

/// Cell values read as missing when loading CSV, matched exactly.
/// Same set pandas' `read_csv` treats as NA by default.
pub const CSV_NA_VALUES: [&str; 19] = [
    "",
    "#N/A",
    "#N/A N/A",
    "#NA",
    "-1.#IND",
    "-1.#QNAN",
    "-NaN",
    "-nan",
    "1.#IND",
    "1.#QNAN",
    "<NA>",
    "N/A",
    "NA",
    "NULL",
    "NaN",
    "None",
    "n/a",
    "nan",
    "null",
];

// Workspace layout
pub const DATA_DIR: &str = "Data";
pub const DEFAULT_OUTPUT_FILENAME: &str = "cleaned_scholarships.json";
pub const SAMPLE_OUTPUT_FILENAME: &str = "cleaned_scholarships_sample.json";
pub const DEFAULT_SAMPLE_SIZE: usize = 10;

/// Raw inputs for the cleaning stage, tried in order
pub const RAW_DATA_CANDIDATES: [&str; 4] = [
    "Data/Scholarships_data.csv",
    "Data_Cleaning/Scholarships_data.csv",
    "scraps/combined_scholarships.json",
    "combined_scholarships.json",
];

/// Inputs for the overview stage, tried in order
pub const ANALYSIS_DATA_CANDIDATES: [&str; 3] = [
    "Data/Scholarships_data.csv",
    "Data/cleaned_scholarships.json",
    "Data/combined_scholarships.json",
];

/// Environment variable that overrides the configured workspace root
pub const WORKSPACE_ENV_VAR: &str = "SCHOLARSHIP_WORKSPACE";
