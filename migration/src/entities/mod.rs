pub mod custom_link;
pub mod custom_link_analytic;
pub mod custom_link_interaction;
pub mod device_analytic;
pub mod social_media_analytic;
pub mod social_media_interaction;
pub mod social_media_link;
pub mod social_media_type;
