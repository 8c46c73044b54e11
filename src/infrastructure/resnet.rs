// ResNet-18 ImageNet classifier on candle
//
// Weights are fetched once from the Hugging Face hub (or read from a local
// safetensors file) and the loaded model is shared across requests.
use crate::application::recognition::ImageClassifier;
use anyhow::{Context, Result};
use candle_core::{DType, Device, Module, Tensor, D};
use candle_nn::{Conv2d, Conv2dConfig, Linear, VarBuilder};
use hf_hub::api::tokio::Api;
use image::imageops::FilterType;
use image::{DynamicImage, GenericImageView};
use std::path::PathBuf;

const RESIZE: u32 = 256;
const CROP: u32 = 224;
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];
const BN_EPS: f64 = 1e-5;
const NUM_CLASSES: usize = 1000;

/// Inference-only batch norm with the running statistics folded into a
/// per-channel scale and shift.
struct FrozenBatchNorm {
    scale: Tensor,
    shift: Tensor,
}

impl FrozenBatchNorm {
    fn load(channels: usize, vb: VarBuilder) -> candle_core::Result<Self> {
        let weight = vb.get(channels, "weight")?;
        let bias = vb.get(channels, "bias")?;
        let running_mean = vb.get(channels, "running_mean")?;
        let running_var = vb.get(channels, "running_var")?;

        let scale = (weight / (running_var + BN_EPS)?.sqrt()?)?;
        let shift = (bias - (running_mean * &scale)?)?;

        Ok(Self {
            scale: scale.reshape((1, channels, 1, 1))?,
            shift: shift.reshape((1, channels, 1, 1))?,
        })
    }
}

impl Module for FrozenBatchNorm {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        xs.broadcast_mul(&self.scale)?.broadcast_add(&self.shift)
    }
}

fn conv(
    in_channels: usize,
    out_channels: usize,
    kernel: usize,
    stride: usize,
    padding: usize,
    vb: VarBuilder,
) -> candle_core::Result<Conv2d> {
    let config = Conv2dConfig {
        padding,
        stride,
        ..Default::default()
    };
    candle_nn::conv2d_no_bias(in_channels, out_channels, kernel, config, vb)
}

struct BasicBlock {
    conv1: Conv2d,
    bn1: FrozenBatchNorm,
    conv2: Conv2d,
    bn2: FrozenBatchNorm,
    downsample: Option<(Conv2d, FrozenBatchNorm)>,
}

impl BasicBlock {
    fn load(in_channels: usize, out_channels: usize, stride: usize, vb: VarBuilder) -> candle_core::Result<Self> {
        let downsample = if stride != 1 || in_channels != out_channels {
            Some((
                conv(in_channels, out_channels, 1, stride, 0, vb.pp("downsample.0"))?,
                FrozenBatchNorm::load(out_channels, vb.pp("downsample.1"))?,
            ))
        } else {
            None
        };

        Ok(Self {
            conv1: conv(in_channels, out_channels, 3, stride, 1, vb.pp("conv1"))?,
            bn1: FrozenBatchNorm::load(out_channels, vb.pp("bn1"))?,
            conv2: conv(out_channels, out_channels, 3, 1, 1, vb.pp("conv2"))?,
            bn2: FrozenBatchNorm::load(out_channels, vb.pp("bn2"))?,
            downsample,
        })
    }
}

impl Module for BasicBlock {
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let ys = self.bn1.forward(&self.conv1.forward(xs)?)?.relu()?;
        let ys = self.bn2.forward(&self.conv2.forward(&ys)?)?;
        let residual = match &self.downsample {
            Some((conv, bn)) => bn.forward(&conv.forward(xs)?)?,
            None => xs.clone(),
        };
        (ys + residual)?.relu()
    }
}

pub struct ResNet18 {
    conv1: Conv2d,
    bn1: FrozenBatchNorm,
    layers: Vec<BasicBlock>,
    fc: Linear,
}

impl ResNet18 {
    pub fn load(vb: VarBuilder) -> candle_core::Result<Self> {
        let mut layers = Vec::with_capacity(8);
        let stages = [(64, 64, 1), (64, 128, 2), (128, 256, 2), (256, 512, 2)];
        for (stage, (in_channels, out_channels, stride)) in stages.into_iter().enumerate() {
            let vb_stage = vb.pp(format!("layer{}", stage + 1));
            layers.push(BasicBlock::load(in_channels, out_channels, stride, vb_stage.pp("0"))?);
            layers.push(BasicBlock::load(out_channels, out_channels, 1, vb_stage.pp("1"))?);
        }

        Ok(Self {
            conv1: conv(3, 64, 7, 2, 3, vb.pp("conv1"))?,
            bn1: FrozenBatchNorm::load(64, vb.pp("bn1"))?,
            layers,
            fc: candle_nn::linear(512, NUM_CLASSES, vb.pp("fc"))?,
        })
    }
}

impl Module for ResNet18 {
    /// (batch, 3, H, W) normalized pixels -> (batch, 1000) logits.
    fn forward(&self, xs: &Tensor) -> candle_core::Result<Tensor> {
        let mut ys = self.bn1.forward(&self.conv1.forward(xs)?)?.relu()?;
        // Zero padding is equivalent to -inf padding here: inputs are post-ReLU.
        ys = ys
            .pad_with_zeros(2, 1, 1)?
            .pad_with_zeros(3, 1, 1)?
            .max_pool2d_with_stride(3, 2)?;
        for block in &self.layers {
            ys = block.forward(&ys)?;
        }
        let pooled = ys.mean(D::Minus1)?.mean(D::Minus1)?;
        self.fc.forward(&pooled)
    }
}

/// Resize the shorter side to 256, center-crop 224 and normalize with the
/// ImageNet channel statistics.
pub fn preprocess(image: &DynamicImage, device: &Device) -> Result<Tensor> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        anyhow::bail!("Image has no pixels");
    }

    let scale = RESIZE as f32 / width.min(height) as f32;
    let new_width = ((width as f32 * scale).round() as u32).max(CROP);
    let new_height = ((height as f32 * scale).round() as u32).max(CROP);
    let resized = image.resize_exact(new_width, new_height, FilterType::Triangle);

    let left = (new_width - CROP) / 2;
    let top = (new_height - CROP) / 2;
    let cropped = resized.crop_imm(left, top, CROP, CROP).to_rgb8();

    let plane = (CROP * CROP) as usize;
    let mut data = vec![0f32; 3 * plane];
    for (x, y, pixel) in cropped.enumerate_pixels() {
        let offset = (y * CROP + x) as usize;
        for channel in 0..3 {
            let value = pixel[channel] as f32 / 255.0;
            data[channel * plane + offset] = (value - MEAN[channel]) / STD[channel];
        }
    }

    Ok(Tensor::from_vec(data, (1, 3, CROP as usize, CROP as usize), device)?)
}

/// Indices of the `k` largest probabilities, most probable first.
pub fn top_k_indices(probs: &[f32], k: usize) -> Vec<(i64, f32)> {
    let mut indexed: Vec<(i64, f32)> = probs
        .iter()
        .enumerate()
        .map(|(i, p)| (i as i64, *p))
        .collect();
    indexed.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    indexed.truncate(k);
    indexed
}

pub struct ResNetClassifier {
    model: ResNet18,
    device: Device,
}

impl ResNetClassifier {
    pub fn new(model: ResNet18, device: Device) -> Self {
        Self { model, device }
    }

    /// Load weights from a local safetensors file if given, otherwise from
    /// the hub repository.
    pub async fn load(weights_path: Option<PathBuf>, repo: &str, file: &str) -> Result<Self> {
        let weights = match weights_path {
            Some(path) => path,
            None => {
                tracing::info!("Fetching classifier weights {}/{}", repo, file);
                let api = Api::new().context("Failed to initialize Hugging Face hub client")?;
                api.model(repo.to_string())
                    .get(file)
                    .await
                    .with_context(|| format!("Failed to download {}/{}", repo, file))?
            }
        };

        let device = Device::Cpu;
        let vb = unsafe { VarBuilder::from_mmaped_safetensors(&[weights], DType::F32, &device)? };
        let model = ResNet18::load(vb).context("Failed to build ResNet-18 from weights")?;

        tracing::info!("ResNet-18 classifier ready");
        Ok(Self::new(model, device))
    }

    pub fn probabilities(&self, image: &DynamicImage) -> Result<Vec<f32>> {
        let input = preprocess(image, &self.device)?;
        let logits = self.model.forward(&input)?;
        let probs = candle_nn::ops::softmax(&logits, D::Minus1)?;
        Ok(probs.squeeze(0)?.to_vec1::<f32>()?)
    }
}

impl ImageClassifier for ResNetClassifier {
    fn top_k(&self, image: &DynamicImage, k: usize) -> Result<Vec<(i64, f32)>> {
        let probs = self.probabilities(image)?;
        Ok(top_k_indices(&probs, k))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_preprocess_shape_and_normalization() {
        let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(640, 480, Rgb([255, 255, 255])));
        let tensor = preprocess(&image, &Device::Cpu).unwrap();
        assert_eq!(tensor.dims(), &[1, 3, 224, 224]);

        // White pixels: (1 - mean) / std per channel
        let values: Vec<f32> = tensor.flatten_all().unwrap().to_vec1().unwrap();
        let red = (1.0 - MEAN[0]) / STD[0];
        assert!((values[0] - red).abs() < 1e-4);
    }

    #[test]
    fn test_preprocess_small_image_is_upscaled() {
        let image = DynamicImage::new_rgb8(10, 30);
        let tensor = preprocess(&image, &Device::Cpu).unwrap();
        assert_eq!(tensor.dims(), &[1, 3, 224, 224]);
    }

    #[test]
    fn test_preprocess_rejects_empty_image() {
        let image = DynamicImage::new_rgb8(0, 0);
        assert!(preprocess(&image, &Device::Cpu).is_err());
    }

    #[test]
    fn test_top_k_indices() {
        let probs = [0.1, 0.5, 0.05, 0.3, 0.05];
        assert_eq!(top_k_indices(&probs, 3), vec![(1, 0.5), (3, 0.3), (0, 0.1)]);
        assert_eq!(top_k_indices(&probs, 10).len(), 5);
    }

    #[test]
    fn test_forward_with_zero_weights_is_uniform() {
        let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
        let model = ResNet18::load(vb).unwrap();
        let input = Tensor::zeros((1, 3, 64, 64), DType::F32, &Device::Cpu).unwrap();

        let logits = model.forward(&input).unwrap();
        assert_eq!(logits.dims(), &[1, NUM_CLASSES]);

        let probs = candle_nn::ops::softmax(&logits, D::Minus1).unwrap();
        let probs: Vec<f32> = probs.squeeze(0).unwrap().to_vec1().unwrap();
        assert!((probs[0] - 1.0 / NUM_CLASSES as f32).abs() < 1e-6);
    }
}
