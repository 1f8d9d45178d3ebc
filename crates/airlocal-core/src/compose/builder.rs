//! Builds the per-environment compose document from creation answers
//!
//! The builder is a pure function of its input: no I/O, and equal answers
//! always produce equal documents.

use std::collections::BTreeMap;

use super::types::{ComposeDocument, NetworkDefinition, Service, VolumeDefinition};
use crate::error::{Error, Result};
use crate::types::{Answers, InstallType};
use crate::{CACHE_VOLUME, SHARED_NETWORK};

const COMPOSE_VERSION: &str = "3";
const PHPFPM_IMAGE: &str = "45air/phpfpm";
const ELASTICSEARCH_IMAGE: &str = "docker.elastic.co/elasticsearch/elasticsearch:5.6.5";
const ELASTICSEARCH_VOLUME: &str = "elasticsearchData";
const ELASTICSEARCH_JAVA_OPTS: &str = "-Xms750m -Xmx750m";
const WEBROOT_MOUNT: &str = "./wordpress:/var/www/html:cached";

/// nginx config file (under `config/nginx/`) used for an installation type
pub fn nginx_config_name(install_type: InstallType) -> &'static str {
    match install_type {
        InstallType::Dev => "develop.conf",
        _ => "default.conf",
    }
}

/// wp-cli config file (under `config/php-fpm/`) used for an installation type
pub fn wp_cli_config_name(install_type: InstallType) -> &'static str {
    match install_type {
        InstallType::Dev => "wp-cli.develop.yml",
        _ => "wp-cli.local.yml",
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Compose document builder
pub struct ComposeBuilder;

impl ComposeBuilder {
    /// Build the compose document for a set of answers
    pub fn build(answers: &Answers) -> Result<ComposeDocument> {
        if answers.hostname.trim().is_empty() {
            return Err(Error::empty_field("hostname"));
        }
        let php_version = answers.php()?;
        let install_type = answers.install_type()?;

        let mut doc = Self::base_document();

        let mut phpfpm = Service::new(format!("{}:{}", PHPFPM_IMAGE, php_version));
        phpfpm.volumes = vec![
            WEBROOT_MOUNT.to_string(),
            "./config/php-fpm/php.ini:/usr/local/etc/php/php.ini:cached".to_string(),
            "./config/php-fpm/docker-php-ext-xdebug.ini:/usr/local/etc/php/conf.d/docker-php-ext-xdebug.ini:cached".to_string(),
            format!("{}:/var/www/.wp-cli/cache:cached", CACHE_VOLUME),
            "~/.ssh:/root/.ssh:cached".to_string(),
            format!(
                "./config/php-fpm/{}:/var/www/.wp-cli/config.yml:cached",
                wp_cli_config_name(install_type)
            ),
        ];
        phpfpm.depends_on = strings(&["memcached"]);
        phpfpm.networks = strings(&["default", SHARED_NETWORK]);
        phpfpm.dns = strings(&["10.0.0.2"]);

        if let Some(nginx) = doc.services.get_mut("nginx") {
            nginx.volumes.push(format!(
                "./config/nginx/{}:/etc/nginx/conf.d/default.conf:cached",
                nginx_config_name(install_type)
            ));
            nginx.environment.insert(
                "VIRTUAL_HOST".to_string(),
                answers.host_set().virtual_host(),
            );
        }

        if answers.elasticsearch {
            phpfpm.depends_on.push("elasticsearch".to_string());
            doc.services
                .insert("elasticsearch".to_string(), Self::elasticsearch());
            doc.volumes.insert(
                ELASTICSEARCH_VOLUME.to_string(),
                VolumeDefinition::default(),
            );
        }

        doc.services.insert("phpfpm".to_string(), phpfpm);
        doc.networks.insert(
            SHARED_NETWORK.to_string(),
            NetworkDefinition::external(SHARED_NETWORK),
        );

        Ok(doc)
    }

    /// Services every environment has, plus the shared cache volume
    fn base_document() -> ComposeDocument {
        let memcached = Service::new("memcached:latest");

        let mut nginx = Service::new("nginx:latest");
        nginx.expose = strings(&["80", "443"]);
        nginx.volumes = strings(&[WEBROOT_MOUNT]);
        nginx.depends_on = strings(&["phpfpm", "memcacheadmin"]);
        nginx.networks = strings(&["default", SHARED_NETWORK]);
        nginx
            .environment
            .insert("CERT_NAME".to_string(), "localhost".to_string());
        nginx
            .environment
            .insert("HTTPS_METHOD".to_string(), "noredirect".to_string());

        let mut memcacheadmin = Service::new("hitwe/phpmemcachedadmin");
        memcacheadmin.expose = strings(&["80"]);
        memcacheadmin.depends_on = strings(&["memcached"]);

        let mut services = BTreeMap::new();
        services.insert("memcached".to_string(), memcached);
        services.insert("nginx".to_string(), nginx);
        services.insert("memcacheadmin".to_string(), memcacheadmin);

        let mut volumes = BTreeMap::new();
        volumes.insert(
            CACHE_VOLUME.to_string(),
            VolumeDefinition::external(CACHE_VOLUME),
        );

        ComposeDocument {
            version: COMPOSE_VERSION.to_string(),
            services,
            networks: BTreeMap::new(),
            volumes,
        }
    }

    fn elasticsearch() -> Service {
        let mut service = Service::new(ELASTICSEARCH_IMAGE);
        service.expose = strings(&["9200"]);
        service.volumes = vec![
            "./config/elasticsearch/elasticsearch.yml:/usr/share/elasticsearch/config/elasticsearch.yml:cached".to_string(),
            "./config/elasticsearch/plugins:/usr/share/elasticsearch/plugins:cached".to_string(),
            format!("{}:/usr/share/elasticsearch/data:delegated", ELASTICSEARCH_VOLUME),
        ];
        service.environment.insert(
            "ES_JAVA_OPTS".to_string(),
            ELASTICSEARCH_JAVA_OPTS.to_string(),
        );
        service
    }
}
