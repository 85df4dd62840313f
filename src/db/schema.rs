pub const SCHEMA: &str = r#"
-- articles table (written by the external scraper/ingestion pipeline)
CREATE TABLE IF NOT EXISTS articles (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    url TEXT NOT NULL UNIQUE,
    content TEXT NOT NULL,
    date TEXT NOT NULL,
    publication TEXT NOT NULL,
    bias TEXT NOT NULL CHECK (bias IN ('left', 'center', 'right')),
    score REAL NOT NULL CHECK (score >= 0.0 AND score <= 1.0),
    image_url TEXT,
    has_perspectives INTEGER NOT NULL DEFAULT 0,
    is_categorized INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_articles_date ON articles(date DESC);
CREATE INDEX IF NOT EXISTS idx_articles_bias ON articles(bias);
CREATE INDEX IF NOT EXISTS idx_articles_publication ON articles(publication);

-- categories table (topic clusters from the categorization pipeline)
CREATE TABLE IF NOT EXISTS categories (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    summary TEXT NOT NULL,
    image_url TEXT,
    background TEXT NOT NULL DEFAULT 'None',
    analytics TEXT NOT NULL DEFAULT '[]',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- membership join table; the UNIQUE on article_id enforces that an
-- article is owned by at most one category
CREATE TABLE IF NOT EXISTS category_articles (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    category_id TEXT NOT NULL REFERENCES categories(id) ON DELETE CASCADE,
    article_id TEXT NOT NULL UNIQUE REFERENCES articles(id) ON DELETE CASCADE
);

CREATE INDEX IF NOT EXISTS idx_category_articles_category ON category_articles(category_id);

-- perspectives table (one record per rewritten article)
CREATE TABLE IF NOT EXISTS perspectives (
    id TEXT PRIMARY KEY,
    article_id TEXT NOT NULL UNIQUE REFERENCES articles(id) ON DELETE CASCADE,
    left_version TEXT NOT NULL,
    right_version TEXT NOT NULL,
    center_version TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- users table
CREATE TABLE IF NOT EXISTS users (
    id TEXT PRIMARY KEY,
    user_name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT,
    profile_pic TEXT,
    auth_type TEXT NOT NULL CHECK (auth_type IN ('local', 'google')),
    google_id TEXT,
    google_profile TEXT,
    role TEXT NOT NULL DEFAULT 'user',
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);

-- saved_categories table; UNIQUE(user_id, category_id) prevents double saves
CREATE TABLE IF NOT EXISTS saved_categories (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    category_id TEXT NOT NULL,
    category_title TEXT NOT NULL,
    category_image_url TEXT,
    saved_at TEXT NOT NULL DEFAULT (datetime('now')),
    UNIQUE(user_id, category_id)
);

CREATE INDEX IF NOT EXISTS idx_saved_categories_user ON saved_categories(user_id, saved_at DESC);

-- feedback table
CREATE TABLE IF NOT EXISTS feedback (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id TEXT NOT NULL,
    user_name TEXT NOT NULL,
    category_id TEXT NOT NULL,
    comment TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX IF NOT EXISTS idx_feedback_category ON feedback(category_id, created_at DESC);
CREATE INDEX IF NOT EXISTS idx_feedback_user ON feedback(user_id, created_at DESC);
"#;
