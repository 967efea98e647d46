use chrono::{NaiveDateTime, Utc};
use rusqlite::{params, Connection};

use crate::models::{
    Category, Job, Message, ProfessionalDocuments, Review, Role, SubCategory, SubCategoryPricing,
    User, VerificationStatus,
};

// ── Users ──

pub fn create_user(conn: &Connection, user: &User) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO users (user_id, username, email, phone_number, password_hash, role, is_verified, verification_otp)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user.user_id,
            user.username,
            user.email,
            user.phone_number,
            user.password_hash,
            user.role.as_str(),
            user.is_verified as i32,
            user.verification_otp,
        ],
    )?;
    Ok(())
}

fn parse_user_row(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        user_id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        phone_number: row.get(3)?,
        password_hash: row.get(4)?,
        role: Role::parse(&row.get::<_, String>(5)?),
        is_verified: row.get::<_, i32>(6)? != 0,
        verification_otp: row.get(7)?,
    })
}

const USER_COLUMNS: &str =
    "user_id, username, email, phone_number, password_hash, role, is_verified, verification_otp";

pub fn get_user_by_id(conn: &Connection, user_id: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
        params![user_id],
        parse_user_row,
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
        params![email],
        parse_user_row,
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_unverified_user_by_otp(conn: &Connection, otp: &str) -> anyhow::Result<Option<User>> {
    let result = conn.query_row(
        &format!(
            "SELECT {USER_COLUMNS} FROM users WHERE verification_otp = ?1 AND is_verified = 0"
        ),
        params![otp],
        parse_user_row,
    );

    match result {
        Ok(user) => Ok(Some(user)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn mark_user_verified(conn: &Connection, user_id: &str) -> anyhow::Result<bool> {
    let count = conn.execute(
        "UPDATE users SET is_verified = 1, verification_otp = NULL, updated_at = datetime('now')
         WHERE user_id = ?1",
        params![user_id],
    )?;
    Ok(count > 0)
}

// ── Categories ──

pub fn list_categories(conn: &Connection) -> anyhow::Result<Vec<Category>> {
    let mut stmt = conn.prepare(
        "SELECT category_id, category_name FROM categories ORDER BY category_name ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok(Category {
            category_id: row.get(0)?,
            category_name: row.get(1)?,
        })
    })?;

    let mut categories = vec![];
    for row in rows {
        categories.push(row?);
    }
    Ok(categories)
}

pub fn get_category(conn: &Connection, category_id: &str) -> anyhow::Result<Option<Category>> {
    let result = conn.query_row(
        "SELECT category_id, category_name FROM categories WHERE category_id = ?1",
        params![category_id],
        |row| {
            Ok(Category {
                category_id: row.get(0)?,
                category_name: row.get(1)?,
            })
        },
    );

    match result {
        Ok(category) => Ok(Some(category)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Sub-categories ──

/// Exact-name lookup; the default BINARY collation keeps it case-sensitive.
pub fn find_sub_category(
    conn: &Connection,
    category_id: &str,
    name: &str,
) -> anyhow::Result<Option<SubCategory>> {
    let result = conn.query_row(
        "SELECT sub_category_id, category_id, sub_category_name FROM sub_categories
         WHERE category_id = ?1 AND sub_category_name = ?2",
        params![category_id, name],
        |row| {
            Ok(SubCategory {
                sub_category_id: row.get(0)?,
                category_id: row.get(1)?,
                sub_category_name: row.get(2)?,
            })
        },
    );

    match result {
        Ok(sub) => Ok(Some(sub)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn create_sub_category(conn: &Connection, sub: &SubCategory) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO sub_categories (sub_category_id, category_id, sub_category_name)
         VALUES (?1, ?2, ?3)",
        params![sub.sub_category_id, sub.category_id, sub.sub_category_name],
    )?;
    Ok(())
}

// ── Jobs ──

pub fn insert_job(conn: &Connection, job: &Job) -> anyhow::Result<()> {
    let created_at = job.created_at.format("%Y-%m-%d %H:%M:%S").to_string();
    let updated_at = job.updated_at.format("%Y-%m-%d %H:%M:%S").to_string();

    conn.execute(
        "INSERT INTO professional_jobs (job_id, user_id, category_id, category_price, latitude, longitude, is_active, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            job.job_id,
            job.user_id,
            job.category_id,
            job.category_price,
            job.latitude,
            job.longitude,
            job.is_active as i32,
            created_at,
            updated_at,
        ],
    )?;
    Ok(())
}

fn parse_job_row(row: &rusqlite::Row) -> rusqlite::Result<Job> {
    let created_at_str: String = row.get(7)?;
    let updated_at_str: String = row.get(8)?;

    let created_at = NaiveDateTime::parse_from_str(&created_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());
    let updated_at = NaiveDateTime::parse_from_str(&updated_at_str, "%Y-%m-%d %H:%M:%S")
        .unwrap_or_else(|_| Utc::now().naive_utc());

    Ok(Job {
        job_id: row.get(0)?,
        user_id: row.get(1)?,
        category_id: row.get(2)?,
        category_price: row.get(3)?,
        latitude: row.get(4)?,
        longitude: row.get(5)?,
        is_active: row.get::<_, i32>(6)? != 0,
        created_at,
        updated_at,
    })
}

const JOB_COLUMNS: &str = "job_id, user_id, category_id, category_price, latitude, longitude, is_active, created_at, updated_at";

pub fn get_job(conn: &Connection, job_id: &str) -> anyhow::Result<Option<Job>> {
    let result = conn.query_row(
        &format!("SELECT {JOB_COLUMNS} FROM professional_jobs WHERE job_id = ?1"),
        params![job_id],
        parse_job_row,
    );

    match result {
        Ok(job) => Ok(Some(job)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// A professional's own jobs with the category display name joined in.
pub fn jobs_for_user(conn: &Connection, user_id: &str) -> anyhow::Result<Vec<(Job, String)>> {
    let mut stmt = conn.prepare(
        "SELECT pj.job_id, pj.user_id, pj.category_id, pj.category_price, pj.latitude, pj.longitude, pj.is_active, pj.created_at, pj.updated_at, c.category_name
         FROM professional_jobs pj
         JOIN categories c ON pj.category_id = c.category_id
         WHERE pj.user_id = ?1
         ORDER BY pj.created_at DESC, pj.job_id ASC",
    )?;

    let rows = stmt.query_map(params![user_id], |row| {
        let job = parse_job_row(row)?;
        let category_name: String = row.get(9)?;
        Ok((job, category_name))
    })?;

    let mut jobs = vec![];
    for row in rows {
        jobs.push(row?);
    }
    Ok(jobs)
}

pub fn update_job_row(
    conn: &Connection,
    job_id: &str,
    user_id: &str,
    category_id: &str,
    category_price: f64,
    latitude: Option<f64>,
    longitude: Option<f64>,
) -> anyhow::Result<usize> {
    let count = conn.execute(
        "UPDATE professional_jobs
         SET category_id = ?1, category_price = ?2, latitude = ?3, longitude = ?4, updated_at = datetime('now')
         WHERE job_id = ?5 AND user_id = ?6",
        params![category_id, category_price, latitude, longitude, job_id, user_id],
    )?;
    Ok(count)
}

pub fn delete_job_row(conn: &Connection, job_id: &str, user_id: &str) -> anyhow::Result<usize> {
    let count = conn.execute(
        "DELETE FROM professional_jobs WHERE job_id = ?1 AND user_id = ?2",
        params![job_id, user_id],
    )?;
    Ok(count)
}

pub fn set_job_active(
    conn: &Connection,
    job_id: &str,
    user_id: &str,
    active: bool,
) -> anyhow::Result<usize> {
    let count = conn.execute(
        "UPDATE professional_jobs SET is_active = ?1, updated_at = datetime('now')
         WHERE job_id = ?2 AND user_id = ?3",
        params![active as i32, job_id, user_id],
    )?;
    Ok(count)
}

// ── Sub-category pricing ──

pub fn insert_pricing(
    conn: &Connection,
    id: &str,
    job_id: &str,
    sub_category_id: &str,
    price: f64,
) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO job_sub_category_pricing (id, job_id, sub_category_id, price)
         VALUES (?1, ?2, ?3, ?4)",
        params![id, job_id, sub_category_id, price],
    )?;
    Ok(())
}

pub fn pricing_for_job(conn: &Connection, job_id: &str) -> anyhow::Result<Vec<SubCategoryPricing>> {
    let mut stmt = conn.prepare(
        "SELECT jscp.id, jscp.job_id, jscp.sub_category_id, sc.sub_category_name, jscp.price
         FROM job_sub_category_pricing jscp
         JOIN sub_categories sc ON jscp.sub_category_id = sc.sub_category_id
         WHERE jscp.job_id = ?1
         ORDER BY jscp.id ASC",
    )?;

    let rows = stmt.query_map(params![job_id], |row| {
        Ok(SubCategoryPricing {
            id: row.get(0)?,
            job_id: row.get(1)?,
            sub_category_id: row.get(2)?,
            sub_category_name: row.get(3)?,
            price: row.get(4)?,
        })
    })?;

    let mut pricing = vec![];
    for row in rows {
        pricing.push(row?);
    }
    Ok(pricing)
}

pub fn delete_pricing_for_job(conn: &Connection, job_id: &str) -> anyhow::Result<usize> {
    let count = conn.execute(
        "DELETE FROM job_sub_category_pricing WHERE job_id = ?1",
        params![job_id],
    )?;
    Ok(count)
}

// ── Offering search ──

#[derive(Debug, Default)]
pub struct OfferingFilter {
    pub category_id: Option<String>,
    pub sub_category_id: Option<String>,
    /// Case-insensitive substring match against the category display name.
    pub text: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OfferingRow {
    pub job_id: String,
    pub user_id: String,
    pub username: String,
    pub category_id: String,
    pub category_name: String,
    pub category_price: f64,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Active offerings matching the filter, price ascending with job id as the
/// stable tie break. Distance filtering happens above this layer.
pub fn search_offerings(
    conn: &Connection,
    filter: &OfferingFilter,
) -> anyhow::Result<Vec<OfferingRow>> {
    let mut sql = String::from(
        "SELECT pj.job_id, pj.user_id, u.username, pj.category_id, c.category_name, pj.category_price, pj.latitude, pj.longitude
         FROM professional_jobs pj
         JOIN users u ON pj.user_id = u.user_id
         JOIN categories c ON pj.category_id = c.category_id
         WHERE pj.is_active = 1",
    );
    let mut params_vec: Vec<Box<dyn rusqlite::types::ToSql>> = vec![];

    if let Some(category_id) = &filter.category_id {
        sql.push_str(&format!(" AND pj.category_id = ?{}", params_vec.len() + 1));
        params_vec.push(Box::new(category_id.clone()));
    }

    if let Some(text) = &filter.text {
        sql.push_str(&format!(
            " AND c.category_name LIKE '%' || ?{} || '%'",
            params_vec.len() + 1
        ));
        params_vec.push(Box::new(text.clone()));
    }

    if let Some(sub_category_id) = &filter.sub_category_id {
        sql.push_str(&format!(
            " AND EXISTS (SELECT 1 FROM job_sub_category_pricing jscp
                          WHERE jscp.job_id = pj.job_id AND jscp.sub_category_id = ?{})",
            params_vec.len() + 1
        ));
        params_vec.push(Box::new(sub_category_id.clone()));
    }

    sql.push_str(" ORDER BY pj.category_price ASC, pj.job_id ASC");

    let mut stmt = conn.prepare(&sql)?;
    let params_refs: Vec<&dyn rusqlite::types::ToSql> =
        params_vec.iter().map(|p| p.as_ref()).collect();

    let rows = stmt.query_map(params_refs.as_slice(), |row| {
        Ok(OfferingRow {
            job_id: row.get(0)?,
            user_id: row.get(1)?,
            username: row.get(2)?,
            category_id: row.get(3)?,
            category_name: row.get(4)?,
            category_price: row.get(5)?,
            latitude: row.get(6)?,
            longitude: row.get(7)?,
        })
    })?;

    let mut offerings = vec![];
    for row in rows {
        offerings.push(row?);
    }
    Ok(offerings)
}

// ── Professional documents ──

pub fn upsert_documents(conn: &Connection, doc: &ProfessionalDocuments) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO professional_documents (document_id, user_id, national_id_document_url, work_clearance_document_url, verification_status)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(user_id) DO UPDATE SET
           national_id_document_url = excluded.national_id_document_url,
           work_clearance_document_url = excluded.work_clearance_document_url,
           verification_status = excluded.verification_status,
           updated_at = datetime('now')",
        params![
            doc.document_id,
            doc.user_id,
            doc.national_id_document_url,
            doc.work_clearance_document_url,
            doc.verification_status.as_str(),
        ],
    )?;
    Ok(())
}

pub fn get_documents(
    conn: &Connection,
    user_id: &str,
) -> anyhow::Result<Option<ProfessionalDocuments>> {
    let result = conn.query_row(
        "SELECT document_id, user_id, national_id_document_url, work_clearance_document_url, verification_status
         FROM professional_documents WHERE user_id = ?1",
        params![user_id],
        |row| {
            Ok(ProfessionalDocuments {
                document_id: row.get(0)?,
                user_id: row.get(1)?,
                national_id_document_url: row.get(2)?,
                work_clearance_document_url: row.get(3)?,
                verification_status: VerificationStatus::parse(&row.get::<_, String>(4)?),
            })
        },
    );

    match result {
        Ok(doc) => Ok(Some(doc)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

// ── Messages ──

pub fn insert_message(conn: &Connection, message: &Message) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO messages (message_id, sender_id, receiver_id, message_text, is_read, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            message.message_id,
            message.sender_id,
            message.receiver_id,
            message.message_text,
            message.is_read as i32,
            message.created_at,
        ],
    )?;
    Ok(())
}

/// Both directions of a conversation, oldest first.
pub fn messages_between(
    conn: &Connection,
    user_a: &str,
    user_b: &str,
) -> anyhow::Result<Vec<Message>> {
    let mut stmt = conn.prepare(
        "SELECT message_id, sender_id, receiver_id, message_text, is_read, created_at
         FROM messages
         WHERE (sender_id = ?1 AND receiver_id = ?2) OR (sender_id = ?2 AND receiver_id = ?1)
         ORDER BY created_at ASC, message_id ASC",
    )?;

    let rows = stmt.query_map(params![user_a, user_b], |row| {
        Ok(Message {
            message_id: row.get(0)?,
            sender_id: row.get(1)?,
            receiver_id: row.get(2)?,
            message_text: row.get(3)?,
            is_read: row.get::<_, i32>(4)? != 0,
            created_at: row.get(5)?,
        })
    })?;

    let mut messages = vec![];
    for row in rows {
        messages.push(row?);
    }
    Ok(messages)
}

// ── Reviews ──

pub fn insert_review(conn: &Connection, review: &Review) -> anyhow::Result<()> {
    conn.execute(
        "INSERT INTO reviews (review_id, client_id, professional_id, rating, review_text, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            review.review_id,
            review.client_id,
            review.professional_id,
            review.rating,
            review.review_text,
            review.created_at,
        ],
    )?;
    Ok(())
}

/// Reviews for a professional with the reviewing client's username.
pub fn reviews_for_professional(
    conn: &Connection,
    professional_id: &str,
) -> anyhow::Result<Vec<(Review, String)>> {
    let mut stmt = conn.prepare(
        "SELECT r.review_id, r.client_id, r.professional_id, r.rating, r.review_text, r.created_at, u.username
         FROM reviews r
         JOIN users u ON r.client_id = u.user_id
         WHERE r.professional_id = ?1
         ORDER BY r.created_at DESC, r.review_id ASC",
    )?;

    let rows = stmt.query_map(params![professional_id], |row| {
        let review = Review {
            review_id: row.get(0)?,
            client_id: row.get(1)?,
            professional_id: row.get(2)?,
            rating: row.get(3)?,
            review_text: row.get(4)?,
            created_at: row.get(5)?,
        };
        let username: String = row.get(6)?;
        Ok((review, username))
    })?;

    let mut reviews = vec![];
    for row in rows {
        reviews.push(row?);
    }
    Ok(reviews)
}
