pub(crate) use {
    std::{
        collections::HashMap,
        fmt,
        time::Duration,
    },
    rocket::{
        Request,
        State,
        http::Status,
        response::content::RawHtml,
        serde::json::Json,
    },
    serde::{
        Deserialize,
        Serialize,
    },
    url::Url,
    crate::config::Config,
};
