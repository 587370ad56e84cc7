use sea_orm::*;
use tracing::{info, warn};

use crate::config::AuthConfig;
use crate::entity::{admin_user, site_config};
use crate::utils::hash;

/// Display strings used when the site configuration row does not exist yet.
pub struct DefaultSiteConfig {
    pub header_top: &'static str,
    pub header_sub: &'static str,
    pub main_title: &'static str,
    pub footer_copyright: &'static str,
    pub footer_address: &'static str,
    pub footer_support: &'static str,
}

pub const DEFAULT_SITE_CONFIG: DefaultSiteConfig = DefaultSiteConfig {
    header_top: "SỞ GIÁO DỤC VÀ ĐÀO TẠO THÀNH PHỐ",
    header_sub: "TRƯỜNG TRUNG HỌC PHỔ THÔNG CHUYÊN",
    main_title: "KỲ THI CHỌN HỌC SINH GIỎI THÀNH PHỐ",
    footer_copyright: "Bản quyền thuộc về Trường THPT Chuyên – Phòng GD&ĐT Thành phố",
    footer_address: "Địa chỉ: Số 01 Đại lộ Giáo dục, Quận Trung tâm, TP. Hà Nội",
    footer_support: "Hỗ trợ kỹ thuật: (024) 123 4567 - Email: congthongtin@school.edu.vn",
};

/// Insert the configured administrator if that email is not registered yet.
///
/// Nothing is seeded unless both `auth.admin_email` and `auth.admin_password`
/// are set.
pub async fn seed_admin(db: &DatabaseConnection, auth: &AuthConfig) -> Result<(), DbErr> {
    let (Some(email), Some(password)) = (&auth.admin_email, &auth.admin_password) else {
        let existing = admin_user::Entity::find().count(db).await?;
        if existing == 0 {
            warn!("No administrator configured; set auth.admin_email and auth.admin_password");
        }
        return Ok(());
    };

    let email = email.trim().to_lowercase();
    let hash = hash::hash_password(password)
        .map_err(|e| DbErr::Custom(format!("Password hash error: {e}")))?;

    let model = admin_user::ActiveModel {
        email: Set(email.clone()),
        password: Set(hash),
        created_at: Set(chrono::Utc::now()),
        ..Default::default()
    };

    let result = admin_user::Entity::insert(model)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(admin_user::Column::Email)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;

    match result {
        Ok(0) | Err(DbErr::RecordNotInserted) => {}
        Ok(_) => info!(%email, "Seeded administrator"),
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Return the site configuration, creating it with defaults if absent.
pub async fn ensure_site_config<C: ConnectionTrait>(db: &C) -> Result<site_config::Model, DbErr> {
    if let Some(existing) = site_config::Entity::find_by_id(site_config::SINGLETON_ID)
        .one(db)
        .await?
    {
        return Ok(existing);
    }

    let defaults = site_config::ActiveModel {
        id: Set(site_config::SINGLETON_ID),
        header_top: Set(DEFAULT_SITE_CONFIG.header_top.to_string()),
        header_sub: Set(DEFAULT_SITE_CONFIG.header_sub.to_string()),
        main_title: Set(DEFAULT_SITE_CONFIG.main_title.to_string()),
        footer_copyright: Set(DEFAULT_SITE_CONFIG.footer_copyright.to_string()),
        footer_address: Set(DEFAULT_SITE_CONFIG.footer_address.to_string()),
        footer_support: Set(DEFAULT_SITE_CONFIG.footer_support.to_string()),
        favicon_url: Set(None),
        updated_at: Set(chrono::Utc::now()),
    };

    // Two first loads may race; whichever insert loses is a no-op.
    let result = site_config::Entity::insert(defaults)
        .on_conflict(
            sea_orm::sea_query::OnConflict::column(site_config::Column::Id)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(db)
        .await;
    match result {
        Ok(0) | Err(DbErr::RecordNotInserted) => {}
        Ok(_) => info!("Created default site configuration"),
        Err(e) => return Err(e),
    }

    site_config::Entity::find_by_id(site_config::SINGLETON_ID)
        .one(db)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound("site_config".into()))
}
