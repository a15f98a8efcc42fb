use burn::{
    nn::{
        attention::{MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        LayerNorm, LayerNormConfig,
        Linear, LinearConfig,
    },
    prelude::*,
};

/// Anything that produces one row of class logits per token.
/// The evaluator only sees this trait.
pub trait TokenClassifier<B: Backend> {
    /// tokens, attention_mask: [batch, seq] → logits: [batch, seq, num_labels]
    /// `attention_mask` is true for real tokens and false for padding.
    fn forward(
        &self,
        tokens:         Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Bool>,
    ) -> Tensor<B, 3>;
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
#[derive(Config, Debug)]
pub struct BertClassifierConfig {
    pub vocab_size:              usize,
    pub hidden_size:             usize,
    pub num_hidden_layers:       usize,
    pub num_attention_heads:     usize,
    pub intermediate_size:       usize,
    pub max_position_embeddings: usize,
    pub type_vocab_size:         usize,
    pub num_labels:              usize,
    #[config(default = 0.1)]
    pub hidden_dropout_prob:     f64,
    #[config(default = 0.1)]
    pub attention_dropout_prob:  f64,
    #[config(default = 1e-12)]
    pub layer_norm_eps:          f64,
}

impl BertClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> BertClassifier<B> {
        let embeddings = BertEmbeddings {
            word_embeddings:       EmbeddingConfig::new(self.vocab_size, self.hidden_size).init(device),
            position_embeddings:   EmbeddingConfig::new(self.max_position_embeddings, self.hidden_size).init(device),
            token_type_embeddings: EmbeddingConfig::new(self.type_vocab_size, self.hidden_size).init(device),
            layer_norm:            self.layer_norm(device),
            dropout:               DropoutConfig::new(self.hidden_dropout_prob).init(),
        };
        let layers: Vec<BertLayer<B>> = (0..self.num_hidden_layers)
            .map(|_| self.build_layer(device))
            .collect();

        BertClassifier {
            bert:       BertModel { embeddings, encoder: BertEncoder { layers } },
            dropout:    DropoutConfig::new(self.hidden_dropout_prob).init(),
            classifier: LinearConfig::new(self.hidden_size, self.num_labels).init(device),
        }
    }

    fn layer_norm<B: Backend>(&self, device: &B::Device) -> LayerNorm<B> {
        LayerNormConfig::new(self.hidden_size)
            .with_epsilon(self.layer_norm_eps)
            .init(device)
    }

    fn build_layer<B: Backend>(&self, device: &B::Device) -> BertLayer<B> {
        let attention = MultiHeadAttentionConfig::new(self.hidden_size, self.num_attention_heads)
            .with_dropout(self.attention_dropout_prob)
            .init(device);
        BertLayer {
            attention,
            attention_norm: self.layer_norm(device),
            intermediate:   LinearConfig::new(self.hidden_size, self.intermediate_size).init(device),
            output:         LinearConfig::new(self.intermediate_size, self.hidden_size).init(device),
            output_norm:    self.layer_norm(device),
            dropout:        DropoutConfig::new(self.hidden_dropout_prob).init(),
        }
    }
}

#[derive(Module, Debug)]
pub struct BertEmbeddings<B: Backend> {
    pub word_embeddings:       Embedding<B>,
    pub position_embeddings:   Embedding<B>,
    pub token_type_embeddings: Embedding<B>,
    pub layer_norm:            LayerNorm<B>,
    pub dropout:               Dropout,
}

impl<B: Backend> BertEmbeddings<B> {
    pub fn forward(&self, tokens: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch_size, seq_len] = tokens.dims();
        let device = tokens.device();

        let positions = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &device)
            .unsqueeze::<2>()
            .expand([batch_size, seq_len]);
        // Single-segment input: every token has type 0
        let token_types = Tensor::<B, 2, Int>::zeros([batch_size, seq_len], &device);

        let x = self.word_embeddings.forward(tokens)
            + self.position_embeddings.forward(positions)
            + self.token_type_embeddings.forward(token_types);

        self.dropout.forward(self.layer_norm.forward(x))
    }
}

/// Post-norm encoder block, laid out like the HuggingFace BERT layer.
#[derive(Module, Debug)]
pub struct BertLayer<B: Backend> {
    pub attention:      MultiHeadAttention<B>,
    pub attention_norm: LayerNorm<B>,
    pub intermediate:   Linear<B>,
    pub output:         Linear<B>,
    pub output_norm:    LayerNorm<B>,
    pub dropout:        Dropout,
}

impl<B: Backend> BertLayer<B> {
    /// `mask_pad` is true at padding positions.
    pub fn forward(&self, x: Tensor<B, 3>, mask_pad: Tensor<B, 2, Bool>) -> Tensor<B, 3> {
        let attn_output = self
            .attention
            .forward(MhaInput::self_attn(x.clone()).mask_pad(mask_pad))
            .context;
        let x = self.attention_norm.forward(x + self.dropout.forward(attn_output));

        let ffn_out = self.output.forward(
            burn::tensor::activation::gelu(self.intermediate.forward(x.clone()))
        );
        self.output_norm.forward(x + self.dropout.forward(ffn_out))
    }
}

#[derive(Module, Debug)]
pub struct BertEncoder<B: Backend> {
    pub layers: Vec<BertLayer<B>>,
}

#[derive(Module, Debug)]
pub struct BertModel<B: Backend> {
    pub embeddings: BertEmbeddings<B>,
    pub encoder:    BertEncoder<B>,
}

/// BERT encoder with a per-token classification head.
#[derive(Module, Debug)]
pub struct BertClassifier<B: Backend> {
    pub bert:       BertModel<B>,
    pub dropout:    Dropout,
    pub classifier: Linear<B>,
}

impl<B: Backend> TokenClassifier<B> for BertClassifier<B> {
    fn forward(
        &self,
        tokens:         Tensor<B, 2, Int>,
        attention_mask: Tensor<B, 2, Bool>,
    ) -> Tensor<B, 3> {
        // MultiHeadAttention wants the inverse: true where padded
        let mask_pad = attention_mask.bool_not();

        let mut x = self.bert.embeddings.forward(tokens);
        for layer in &self.bert.encoder.layers {
            x = layer.forward(x, mask_pad.clone());
        }

        self.classifier.forward(self.dropout.forward(x)) // [batch, seq, num_labels]
    }
}
