use serde::Deserialize;

use super::LookupError;

/// Address fields resolved from a postal code.
#[derive(Debug, Clone)]
pub struct ResolvedAddress {
    pub street: String,
    pub neighborhood: String,
    pub city: String,
    pub state: String,
}

#[derive(Debug, Clone)]
pub struct Region {
    pub code: String,
    pub name: String,
}

/// Postal-code resolution capability. Injected at the calling layer; the
/// core never blocks on it and on failure leaves address fields unchanged.
#[allow(async_fn_in_trait)]
pub trait AddressLookup {
    async fn resolve_postal(&self, cep: &str) -> Result<ResolvedAddress, LookupError>;
}

/// Region/city list capability, keyed by region code.
#[allow(async_fn_in_trait)]
pub trait RegionLookup {
    async fn regions(&self) -> Result<Vec<Region>, LookupError>;
    async fn cities(&self, region_code: &str) -> Result<Vec<String>, LookupError>;
}

/// ViaCEP client: https://viacep.com.br
pub struct ViaCep {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct ViaCepResponse {
    #[serde(default)]
    logradouro: String,
    #[serde(default)]
    bairro: String,
    #[serde(default)]
    localidade: String,
    #[serde(default)]
    uf: String,
    #[serde(default)]
    erro: bool,
}

impl ViaCep {
    pub fn new() -> Self {
        Self::with_base_url("https://viacep.com.br")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for ViaCep {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressLookup for ViaCep {
    async fn resolve_postal(&self, cep: &str) -> Result<ResolvedAddress, LookupError> {
        let digits: String = cep.chars().filter(|c| c.is_ascii_digit()).collect();
        let url = format!("{}/ws/{}/json/", self.base_url, digits);

        let response: ViaCepResponse = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.erro {
            return Err(LookupError::NotFound(format!("postal code {}", cep)));
        }

        Ok(ResolvedAddress {
            street: response.logradouro,
            neighborhood: response.bairro,
            city: response.localidade,
            state: response.uf,
        })
    }
}

/// IBGE localidades client: https://servicodados.ibge.gov.br
pub struct IbgeLocalidades {
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct IbgeRegion {
    sigla: String,
    nome: String,
}

#[derive(Deserialize)]
struct IbgeCity {
    nome: String,
}

impl IbgeLocalidades {
    pub fn new() -> Self {
        Self::with_base_url("https://servicodados.ibge.gov.br/api/v1/localidades")
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }
}

impl Default for IbgeLocalidades {
    fn default() -> Self {
        Self::new()
    }
}

impl RegionLookup for IbgeLocalidades {
    async fn regions(&self) -> Result<Vec<Region>, LookupError> {
        let url = format!("{}/estados?orderBy=nome", self.base_url);
        let regions: Vec<IbgeRegion> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(regions
            .into_iter()
            .map(|r| Region {
                code: r.sigla,
                name: r.nome,
            })
            .collect())
    }

    async fn cities(&self, region_code: &str) -> Result<Vec<String>, LookupError> {
        let url = format!(
            "{}/estados/{}/municipios?orderBy=nome",
            self.base_url, region_code
        );
        let cities: Vec<IbgeCity> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(cities.into_iter().map(|c| c.nome).collect())
    }
}
