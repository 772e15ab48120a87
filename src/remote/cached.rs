//! Cached view of any [`DesignApi`] target.

use async_trait::async_trait;
use serde_json::Value;

use crate::cache::{CacheControl, CacheTarget, Cached};
use crate::error::ApiError;
use crate::remote::DesignApi;

#[async_trait]
impl<T> DesignApi for Cached<T>
where
    T: DesignApi + CacheTarget,
{
    async fn get_file(
        &self,
        file_key: &str,
        control: Option<CacheControl>,
    ) -> Result<Value, ApiError> {
        self.cache()
            .call("get_file", &(file_key,), control, || {
                self.inner().get_file(file_key, control)
            })
            .await
    }

    async fn get_file_nodes(
        &self,
        file_key: &str,
        ids: Option<&str>,
        control: Option<CacheControl>,
    ) -> Result<Value, ApiError> {
        self.cache()
            .call("get_file_nodes", &(file_key, ids), control, || {
                self.inner().get_file_nodes(file_key, ids, control)
            })
            .await
    }

    async fn get_file_styles(
        &self,
        file_key: &str,
        control: Option<CacheControl>,
    ) -> Result<Vec<Value>, ApiError> {
        self.cache()
            .call("get_file_styles", &(file_key,), control, || {
                self.inner().get_file_styles(file_key, control)
            })
            .await
    }

    async fn get_style(
        &self,
        style_key: &str,
        control: Option<CacheControl>,
    ) -> Result<Value, ApiError> {
        self.cache()
            .call("get_style", &(style_key,), control, || {
                self.inner().get_style(style_key, control)
            })
            .await
    }
}
